//! Atomic board edits.
//!
//! An `Action` is one indivisible change to the board. A full turn is an
//! ordered list of actions (see [`Move`](super::Move)). Actions are
//! compared structurally, which is what lets the move tree merge the
//! common prefixes of different moves.
//!
//! ## Example
//!
//! ```
//! use rust_boardplay::core::{Action, Color, Dir, Piece, Position};
//!
//! let pawn = Piece::new(0, Color::new(1));
//!
//! // Place a pawn
//! let add = Action::add(pawn, Position::new(0, 0));
//!
//! // Slide two pieces one cell to the right
//! let slide = Action::move_pieces(Dir::Right, 1, &[Position::new(1, 0), Position::new(1, 1)]);
//!
//! assert_eq!(add.positions(), &[Position::new(0, 0)]);
//! assert_eq!(slide.positions().len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::piece::Piece;
use super::position::{Dir, Position};

/// Position list of a multi-cell action.
/// SmallVec keeps the common case (up to 4 cells) off the heap.
pub type Positions = SmallVec<[Position; 4]>;

/// One atomic board edit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Put `piece` on `pos`, replacing whatever was there.
    Add { piece: Piece, pos: Position },

    /// Clear every listed cell.
    Remove { positions: Positions },

    /// Shift the pieces on `positions` by `steps` cells towards `dir`.
    Move {
        dir: Dir,
        steps: u32,
        positions: Positions,
    },

    /// Move the piece on `from` to `to`.
    Jump { from: Position, to: Position },

    /// Replace the pieces on `positions` with `piece`.
    Swap { piece: Piece, positions: Positions },
}

impl Action {
    /// Create an `Add` action.
    #[must_use]
    pub fn add(piece: Piece, pos: Position) -> Self {
        Action::Add { piece, pos }
    }

    /// Create a `Remove` action.
    #[must_use]
    pub fn remove(positions: &[Position]) -> Self {
        Action::Remove {
            positions: SmallVec::from_slice(positions),
        }
    }

    /// Create a `Move` action.
    #[must_use]
    pub fn move_pieces(dir: Dir, steps: u32, positions: &[Position]) -> Self {
        Action::Move {
            dir,
            steps,
            positions: SmallVec::from_slice(positions),
        }
    }

    /// Create a `Jump` action.
    #[must_use]
    pub fn jump(from: Position, to: Position) -> Self {
        Action::Jump { from, to }
    }

    /// Create a `Swap` action.
    #[must_use]
    pub fn swap(piece: Piece, positions: &[Position]) -> Self {
        Action::Swap {
            piece,
            positions: SmallVec::from_slice(positions),
        }
    }

    /// Cells the action starts from.
    ///
    /// This is what a player clicks to pick the action: the single source
    /// cell of a `Jump`, the target cell of an `Add`, and the full position
    /// list otherwise.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        match self {
            Action::Add { pos, .. } => std::slice::from_ref(pos),
            Action::Jump { from, .. } => std::slice::from_ref(from),
            Action::Remove { positions }
            | Action::Move { positions, .. }
            | Action::Swap { positions, .. } => positions,
        }
    }

    /// The piece an `Add` or `Swap` places, if any.
    #[must_use]
    pub fn placed_piece(&self) -> Option<Piece> {
        match self {
            Action::Add { piece, .. } | Action::Swap { piece, .. } => Some(*piece),
            _ => None,
        }
    }

    /// Short name of the action kind, used in logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Action::Add { .. } => "add",
            Action::Remove { .. } => "remove",
            Action::Move { .. } => "move",
            Action::Jump { .. } => "jump",
            Action::Swap { .. } => "swap",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    fn piece(species: u8) -> Piece {
        Piece::new(species, Color::new(0))
    }

    #[test]
    fn test_positions_per_kind() {
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);

        assert_eq!(Action::add(piece(1), a).positions(), &[a]);
        assert_eq!(Action::remove(&[a, b]).positions(), &[a, b]);
        assert_eq!(Action::move_pieces(Dir::Up, 2, &[b]).positions(), &[b]);
        assert_eq!(Action::jump(a, b).positions(), &[a]);
        assert_eq!(Action::swap(piece(2), &[b, a]).positions(), &[b, a]);
    }

    #[test]
    fn test_placed_piece() {
        let a = Position::new(0, 0);

        assert_eq!(Action::add(piece(1), a).placed_piece(), Some(piece(1)));
        assert_eq!(Action::swap(piece(2), &[a]).placed_piece(), Some(piece(2)));
        assert_eq!(Action::remove(&[a]).placed_piece(), None);
        assert_eq!(Action::jump(a, a).placed_piece(), None);
    }

    #[test]
    fn test_action_equality() {
        let a = Position::new(0, 0);
        let b = Position::new(1, 1);

        assert_eq!(Action::jump(a, b), Action::jump(a, b));
        assert_ne!(Action::jump(a, b), Action::jump(b, a));
        assert_ne!(Action::add(piece(1), a), Action::add(piece(2), a));
        assert_ne!(Action::remove(&[a, b]), Action::remove(&[b, a]));
    }

    #[test]
    fn test_action_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |a: &Action| {
            let mut h = DefaultHasher::new();
            a.hash(&mut h);
            h.finish()
        };

        let a1 = Action::swap(piece(1), &[Position::new(2, 3)]);
        let a2 = Action::swap(piece(1), &[Position::new(2, 3)]);
        let a3 = Action::swap(piece(1), &[Position::new(3, 2)]);

        assert_eq!(hash(&a1), hash(&a2));
        assert_ne!(hash(&a1), hash(&a3));
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::move_pieces(Dir::DownRight, 3, &[Position::new(4, 4)]);
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();

        assert_eq!(action, deserialized);
    }
}
