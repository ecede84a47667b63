//! Arena entries of the move tree.
//!
//! Every node stores the whole action prefix leading to it, so a node can be
//! turned back into a move without walking up the tree. Links between nodes
//! are arena indices; the `MoveTree` owns all of them.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Action;

/// Arena index of a move-tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Marks a missing link: the root's parent, or the root of an empty tree.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Position in the arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("#-")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// One prefix shared by at least one legal move.
///
/// The sub-move on the edge into this node is the tail of `actions` past the
/// parent's prefix. A node marked `is_final` is a complete move on its own
/// and may still lead to longer ones.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveNode {
    pub parent: NodeId,
    pub actions: Vec<Action>,
    /// Insertion order; first actions are pairwise distinct.
    pub children: SmallVec<[NodeId; 4]>,
    pub is_final: bool,
}

impl MoveNode {
    pub fn new(parent: NodeId, actions: Vec<Action>, is_final: bool) -> Self {
        Self {
            parent,
            actions,
            children: SmallVec::new(),
            is_final,
        }
    }

    /// A parentless node holding the prefix common to every move.
    pub fn root(actions: Vec<Action>, is_final: bool) -> Self {
        Self::new(NodeId::NONE, actions, is_final)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of actions from the start of the move to this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.actions.len()
    }
}
