//! Stateful, undoable navigation of a move tree driven by board clicks.
//!
//! A `MoveChooser` wraps a [`MoveTree`] with a cursor, the set of currently
//! clicked positions, and a private board with one snapshot per applied
//! action. A front-end drives it:
//!
//! 1. `select` the clicked cells; the children whose first action starts
//!    on exactly those cells become the *selected* children;
//! 2. commit to one of them with `do_selection` (piece choice or removal),
//!    `jump_selection` or `move_selection`; the cursor advances and the
//!    applied sub-move is returned for animation;
//! 3. `back` undoes the last step and returns the inverse actions;
//! 4. `choose` (at a final node), `pass` or `resign` ends the interaction.
//!
//! The terminal operations hand the resulting `Move` to the single
//! [`MoveWaiter`] and disable the chooser for good: every later call fails
//! with [`Error::ChooserUsed`].
//!
//! All state sits behind one mutex taken per call, so a chooser can be
//! shared between UI callbacks and other threads.
//!
//! ```
//! use rust_boardplay::core::{Action, Board, Color, Move, Piece, Position};
//! use rust_boardplay::movetree::MoveChooser;
//!
//! let a = Piece::new(0, Color::new(0));
//! let b = Piece::new(1, Color::new(0));
//! let cell = Position::new(0, 0);
//! let moves = [Move::play([Action::add(a, cell)]), Move::play([Action::add(b, cell)])];
//!
//! let (chooser, waiter) = MoveChooser::new(moves, Board::rect(3, 3));
//! assert_eq!(chooser.select(&[cell]).unwrap().len(), 2);
//! assert_eq!(chooser.selection_pieces().unwrap(), vec![Some(a), Some(b)]);
//! chooser.do_selection(Some(a)).unwrap();
//! let chosen = chooser.choose().unwrap();
//! assert_eq!(waiter.wait(), Some(chosen));
//! ```

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::debug;

use super::node::NodeId;
use super::tree::MoveTree;
use crate::core::{Action, Board, Dir, Move, Piece, Position};
use crate::error::{Error, Result};

/// Interactive move builder over the valid moves of one turn.
pub struct MoveChooser {
    state: Mutex<ChooserState>,
}

/// Receiving end of a chooser: yields the move once it has been made.
pub struct MoveWaiter {
    rx: Receiver<Move>,
}

struct ChooserState {
    tree: MoveTree,

    /// Cursor, `None` only for an empty tree.
    current: Option<NodeId>,

    /// Positions passed to the last `select`.
    selection: Vec<Position>,

    /// Children of `current` matching `selection`.
    selected: Vec<NodeId>,

    /// Board after every action applied so far.
    board: Board,

    /// Board before each applied action, oldest first.
    undo: Vec<Board>,

    may_pass: bool,
    used: bool,

    /// Taken by the first terminal operation.
    signal: Option<SyncSender<Move>>,
}

impl MoveChooser {
    /// Create a chooser for the given valid moves, starting from `board`.
    ///
    /// The root's common prefix, if any, is applied right away.
    pub fn new(moves: impl IntoIterator<Item = Move>, board: Board) -> (Self, MoveWaiter) {
        let moves: Vec<Move> = moves.into_iter().collect();
        let may_pass = moves.contains(&Move::Pass);
        let tree = MoveTree::build(moves);
        let current = tree.root();
        let (tx, rx) = mpsc::sync_channel(1);

        let mut state = ChooserState {
            tree,
            current,
            selection: Vec::new(),
            selected: Vec::new(),
            board,
            undo: Vec::new(),
            may_pass,
            used: false,
            signal: Some(tx),
        };
        if let Some(root) = current {
            let prefix = state.tree.sub_move(root).to_vec();
            state.replay(&prefix);
        }

        let chooser = Self {
            state: Mutex::new(state),
        };
        (chooser, MoveWaiter { rx })
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ChooserState) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        if state.used {
            return Err(Error::ChooserUsed);
        }
        f(&mut state)
    }

    /// Check if a terminal operation already happened.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.state.lock().used
    }

    /// The chooser's board, with every applied sub-move on it.
    pub fn board(&self) -> Result<Board> {
        self.with_state(|s| Ok(s.board.clone()))
    }

    /// Positions of the last `select`.
    pub fn selection(&self) -> Result<Vec<Position>> {
        self.with_state(|s| Ok(s.selection.clone()))
    }

    /// Actions the current node adds to its parent. At the root this is the
    /// common prefix of all moves, possibly empty.
    pub fn sub_move(&self) -> Result<Vec<Action>> {
        self.with_state(|s| {
            Ok(s.current
                .map(|id| s.tree.sub_move(id).to_vec())
                .unwrap_or_default())
        })
    }

    /// Sub-moves of every child of the current node.
    pub fn children_sub_moves(&self) -> Result<Vec<Vec<Action>>> {
        self.with_state(|s| {
            let Some(current) = s.current else {
                return Ok(Vec::new());
            };
            Ok(s.sub_moves(s.tree.children(current)))
        })
    }

    /// Replace the selection and return the sub-moves of the children whose
    /// first action starts on exactly these positions.
    ///
    /// A selection matching nothing is fine and yields an empty list.
    pub fn select(&self, positions: &[Position]) -> Result<Vec<Vec<Action>>> {
        self.with_state(|s| {
            let wanted = s.validate(positions)?;
            let matching: Vec<NodeId> = s
                .current_children()
                .into_iter()
                .filter(|&child| s.first_action_key(child) == wanted)
                .collect();

            s.selection = positions.to_vec();
            s.selected = matching;
            Ok(s.sub_moves(&s.selected))
        })
    }

    /// Sub-moves of the children whose first action starts on a strict
    /// superset of the selection: the moves that need more cells clicked.
    pub fn quasi_selected(&self) -> Result<Vec<Vec<Action>>> {
        self.with_state(|s| {
            if s.selection.is_empty() {
                return Ok(Vec::new());
            }
            let wanted: FxHashSet<Position> = s.selection.iter().copied().collect();
            let matching: Vec<NodeId> = s
                .current_children()
                .into_iter()
                .filter(|&child| {
                    let key = s.first_action_key(child);
                    key.len() > wanted.len() && key.is_superset(&wanted)
                })
                .collect();
            Ok(s.sub_moves(&matching))
        })
    }

    /// Pieces the player can pick among the selected children.
    ///
    /// - all selected first actions are `Add`/`Swap`: their distinct pieces;
    /// - a single selected child starting with `Remove`: `[None]`, meaning
    ///   no further choice is needed;
    /// - otherwise empty.
    pub fn selection_pieces(&self) -> Result<Vec<Option<Piece>>> {
        self.with_state(|s| {
            let firsts: Vec<&Action> = s.selected.iter().map(|&c| s.first_action(c)).collect();
            if firsts.is_empty() {
                return Ok(Vec::new());
            }
            if firsts.iter().all(|a| a.placed_piece().is_some()) {
                let mut pieces: Vec<Piece> = firsts.iter().filter_map(|a| a.placed_piece()).collect();
                pieces.sort();
                pieces.dedup();
                return Ok(pieces.into_iter().map(Some).collect());
            }
            if firsts.len() == 1 && matches!(firsts[0], Action::Remove { .. }) {
                return Ok(vec![None]);
            }
            Ok(Vec::new())
        })
    }

    /// Commit to the selected child placing `piece` (`Add`/`Swap`), or with
    /// `None` to the selected child starting with a `Remove`.
    ///
    /// Returns the applied sub-move, or `None` if no unique child matches.
    pub fn do_selection(&self, piece: Option<Piece>) -> Result<Option<Vec<Action>>> {
        self.with_state(|s| {
            Ok(s.commit_unique(|action| match piece {
                Some(piece) => action.placed_piece() == Some(piece),
                None => matches!(action, Action::Remove { .. }),
            }))
        })
    }

    /// Commit to the selected child whose first action jumps to `to`.
    pub fn jump_selection(&self, to: Position) -> Result<Option<Vec<Action>>> {
        self.with_state(|s| {
            Ok(s.commit_unique(|action| matches!(action, Action::Jump { to: t, .. } if *t == to)))
        })
    }

    /// Commit to the selected child whose first action moves `steps` cells
    /// towards `dir`.
    pub fn move_selection(&self, dir: Dir, steps: u32) -> Result<Option<Vec<Action>>> {
        self.with_state(|s| {
            Ok(s.commit_unique(|action| {
                matches!(action, Action::Move { dir: d, steps: n, .. } if *d == dir && *n == steps)
            }))
        })
    }

    /// Undo the current node's sub-move and return to its parent.
    ///
    /// Returns the inverse actions, last action first. At the root this is a
    /// no-op returning `None`.
    pub fn back(&self) -> Result<Option<Vec<Action>>> {
        self.with_state(|s| {
            let Some(current) = s.current else {
                return Ok(None);
            };
            let Some(parent) = s.tree.parent(current) else {
                return Ok(None);
            };

            let sub = s.tree.sub_move(current).to_vec();
            let mut inverse = Vec::new();
            for action in sub.iter().rev() {
                let Some(before) = s.undo.pop() else {
                    break;
                };
                inverse.extend(before.inverse(action));
                s.board = before;
            }

            debug!(from = %current, to = %parent, actions = sub.len(), "move chooser back");
            s.current = Some(parent);
            s.clear_selection();
            Ok((!inverse.is_empty()).then_some(inverse))
        })
    }

    /// Check if the current node is a complete move.
    pub fn is_final(&self) -> Result<bool> {
        self.with_state(|s| Ok(s.is_final()))
    }

    /// Make the move ending at the current node.
    ///
    /// At a final node that also has children this forecloses the longer
    /// continuations.
    pub fn choose(&self) -> Result<Move> {
        self.with_state(|s| {
            let current = s.current.filter(|_| s.is_final()).ok_or(Error::NotFinal)?;
            let mv = Move::Play(s.tree.get(current).actions.clone());
            s.finish(mv.clone());
            Ok(mv)
        })
    }

    /// Check if passing is among the valid moves.
    pub fn may_pass(&self) -> Result<bool> {
        self.with_state(|s| Ok(s.may_pass))
    }

    /// Pass the turn.
    pub fn pass(&self) -> Result<Move> {
        self.with_state(|s| {
            if !s.may_pass {
                return Err(Error::PassNotAllowed);
            }
            s.finish(Move::Pass);
            Ok(Move::Pass)
        })
    }

    /// Resign the match.
    pub fn resign(&self) -> Result<Move> {
        self.with_state(|s| {
            s.finish(Move::Resign);
            Ok(Move::Resign)
        })
    }
}

impl ChooserState {
    fn validate(&self, positions: &[Position]) -> Result<FxHashSet<Position>> {
        if positions.is_empty() {
            return Err(Error::EmptySelection);
        }
        let mut set = FxHashSet::default();
        for &pos in positions {
            if !self.board.contains(pos) {
                return Err(Error::UnknownPosition(pos));
            }
            if !set.insert(pos) {
                return Err(Error::DuplicatePosition(pos));
            }
        }
        Ok(set)
    }

    fn current_children(&self) -> Vec<NodeId> {
        self.current
            .map(|id| self.tree.children(id).to_vec())
            .unwrap_or_default()
    }

    fn sub_moves(&self, nodes: &[NodeId]) -> Vec<Vec<Action>> {
        nodes.iter().map(|&id| self.tree.sub_move(id).to_vec()).collect()
    }

    /// First action of a child's sub-move; sub-moves below the root are
    /// never empty.
    fn first_action(&self, child: NodeId) -> &Action {
        &self.tree.sub_move(child)[0]
    }

    fn first_action_key(&self, child: NodeId) -> FxHashSet<Position> {
        self.first_action(child).positions().iter().copied().collect()
    }

    fn is_final(&self) -> bool {
        self.current
            .map(|id| self.tree.get(id).is_final)
            .unwrap_or(false)
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.selected.clear();
    }

    fn replay(&mut self, actions: &[Action]) {
        for action in actions {
            let mut next = self.board.clone();
            next.apply(action);
            self.undo.push(std::mem::replace(&mut self.board, next));
        }
    }

    /// Advance into the unique selected child whose first action satisfies
    /// `accept`.
    fn commit_unique(&mut self, accept: impl Fn(&Action) -> bool) -> Option<Vec<Action>> {
        let candidates: Vec<NodeId> = self
            .selected
            .iter()
            .copied()
            .filter(|&child| accept(self.first_action(child)))
            .collect();
        let [child] = candidates[..] else {
            return None;
        };

        let sub = self.tree.sub_move(child).to_vec();
        self.replay(&sub);
        debug!(to = %child, actions = sub.len(), "move chooser advance");
        self.current = Some(child);
        self.clear_selection();
        Some(sub)
    }

    fn finish(&mut self, mv: Move) {
        debug!(chosen = %mv, "move chooser done");
        self.used = true;
        self.clear_selection();
        if let Some(signal) = self.signal.take() {
            // The waiter may already be gone; nothing to deliver to then.
            let _ = signal.try_send(mv);
        }
    }
}

impl MoveWaiter {
    /// Block until the move is made. `None` if the chooser was dropped
    /// without a terminal operation.
    #[must_use]
    pub fn wait(self) -> Option<Move> {
        self.rx.recv().ok()
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Move> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// The move, if it has already been made.
    #[must_use]
    pub fn try_take(&self) -> Option<Move> {
        self.rx.try_recv().ok()
    }
}
