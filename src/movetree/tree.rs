//! Arena-based prefix tree over the valid moves of one turn.
//!
//! Every edge carries a non-empty slice of actions (a "sub-move"); moves
//! sharing a common action prefix share the nodes along it. Every valid
//! move corresponds to exactly one final node, and internal non-final nodes
//! exist only where two or more moves branch apart.

use serde::{Deserialize, Serialize};

use super::node::{MoveNode, NodeId};
use crate::core::{Action, Move};

/// Prefix tree of action moves.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveTree {
    /// All nodes in the tree.
    nodes: Vec<MoveNode>,

    /// The root node ID, NONE for an empty tree.
    root: NodeId,
}

impl Default for MoveTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl MoveTree {
    /// Create a tree with no root.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId::NONE,
        }
    }

    /// Build the tree for a set of valid moves.
    ///
    /// `Pass` and `Resign` are ignored and duplicates collapse. Moves are
    /// sorted first so children come out in a stable order.
    ///
    /// ```
    /// use rust_boardplay::core::{Action, Color, Move, Piece, Position};
    /// use rust_boardplay::movetree::MoveTree;
    ///
    /// let a = Piece::new(0, Color::new(0));
    /// let b = Piece::new(1, Color::new(0));
    /// let cell = Position::new(0, 0);
    ///
    /// let tree = MoveTree::build([
    ///     Move::play([Action::add(a, cell)]),
    ///     Move::play([Action::add(b, cell)]),
    ///     Move::Pass,
    /// ]);
    ///
    /// let root = tree.root().unwrap();
    /// assert!(tree.sub_move(root).is_empty());
    /// assert_eq!(tree.children(root).len(), 2);
    /// ```
    pub fn build(moves: impl IntoIterator<Item = Move>) -> Self {
        let mut sequences: Vec<Vec<Action>> = moves
            .into_iter()
            .filter_map(|mv| match mv {
                Move::Play(actions) if !actions.is_empty() => Some(actions),
                _ => None,
            })
            .collect();
        sequences.sort();
        sequences.dedup();

        let mut tree = Self::empty();
        match sequences.len() {
            0 => {}
            1 => {
                let only = sequences.pop().unwrap_or_default();
                tree.root = tree.alloc(MoveNode::root(only, true));
            }
            _ => {
                let prefix = common_prefix(&sequences);
                let is_final = sequences.iter().any(|s| s.len() == prefix.len());
                tree.root = tree.alloc(MoveNode::root(prefix, is_final));
                for sequence in &sequences {
                    tree.insert(sequence);
                }
            }
        }
        tree
    }

    /// Insert one move below the root.
    ///
    /// The root prefix must be a prefix of `actions`.
    fn insert(&mut self, actions: &[Action]) {
        let mut node = self.root;
        loop {
            let depth = self.get(node).depth();
            if depth == actions.len() {
                // A shorter move that is a prefix of longer ones.
                self.get_mut(node).is_final = true;
                return;
            }
            if self.get(node).is_leaf() {
                self.add_child(node, actions.to_vec(), true);
                return;
            }

            let rest = &actions[depth..];
            let best = self
                .get(node)
                .children
                .iter()
                .enumerate()
                .map(|(idx, &child)| (idx, child, shared_len(self.sub_move(child), rest)))
                .filter(|&(_, _, shared)| shared > 0)
                .max_by_key(|&(_, _, shared)| shared);

            match best {
                None => {
                    self.add_child(node, actions.to_vec(), true);
                    return;
                }
                Some((_, child, shared)) if shared == self.sub_move(child).len() => {
                    node = child;
                }
                Some((idx, child, shared)) => {
                    node = self.split(node, idx, child, depth + shared);
                }
            }
        }
    }

    /// Splice a non-final node holding `child`'s first `prefix_len` actions
    /// between `parent` and `child`.
    fn split(&mut self, parent: NodeId, idx: usize, child: NodeId, prefix_len: usize) -> NodeId {
        let prefix = self.get(child).actions[..prefix_len].to_vec();
        let middle = self.alloc(MoveNode::new(parent, prefix, false));
        self.get_mut(middle).children.push(child);
        self.get_mut(child).parent = middle;
        self.get_mut(parent).children[idx] = middle;
        middle
    }

    fn add_child(&mut self, parent: NodeId, actions: Vec<Action>, is_final: bool) -> NodeId {
        let child = self.alloc(MoveNode::new(parent, actions, is_final));
        self.get_mut(parent).children.push(child);
        child
    }

    fn alloc(&mut self, node: MoveNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the root node ID, `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        (!self.root.is_none()).then_some(self.root)
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MoveNode {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut MoveNode {
        &mut self.nodes[id.index()]
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id).parent;
        (!parent.is_none()).then_some(parent)
    }

    /// Children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Actions the edge into `id` contributes. For the root this is the
    /// common prefix of all moves, possibly empty.
    #[must_use]
    pub fn sub_move(&self, id: NodeId) -> &[Action] {
        let node = self.get(id);
        match self.parent(id) {
            None => &node.actions,
            Some(parent) => &node.actions[self.get(parent).depth()..],
        }
    }

    /// Find the node whose action prefix is exactly `actions`.
    #[must_use]
    pub fn find(&self, actions: &[Action]) -> Option<NodeId> {
        let mut node = self.root()?;
        loop {
            let current = self.get(node);
            if current.actions == actions {
                return Some(node);
            }
            if !actions.starts_with(&current.actions) {
                return None;
            }
            node = *current
                .children
                .iter()
                .find(|&&child| actions.starts_with(&self.get(child).actions))?;
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flatten the tree back into its moves, one per final node.
    #[must_use]
    pub fn moves(&self) -> Vec<Move> {
        self.nodes
            .iter()
            .filter(|n| n.is_final && !n.actions.is_empty())
            .map(|n| Move::Play(n.actions.clone()))
            .collect()
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: self.nodes.len(),
            final_count: self.nodes.iter().filter(|n| n.is_final).count(),
            final_internal_count: self
                .nodes
                .iter()
                .filter(|n| n.is_final && !n.is_leaf())
                .count(),
            max_depth: self.nodes.iter().map(MoveNode::depth).max().unwrap_or(0),
        }
    }
}

/// Statistics about a move tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Number of final nodes, i.e. of distinct moves.
    pub final_count: usize,

    /// Final nodes that also extend into longer moves.
    pub final_internal_count: usize,

    /// Longest move, in actions.
    pub max_depth: usize,
}

fn shared_len(a: &[Action], b: &[Action]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_prefix(sequences: &[Vec<Action>]) -> Vec<Action> {
    let Some((first, rest)) = sequences.split_first() else {
        return Vec::new();
    };
    let len = rest
        .iter()
        .map(|s| shared_len(first, s))
        .min()
        .unwrap_or(first.len());
    first[..len].to_vec()
}
