//! Board contents and action replay.
//!
//! A `Board` is a set of valid cells plus the pieces standing on them.
//! Both are persistent `im` structures, so cloning a board is O(1); the
//! move chooser relies on this to keep one snapshot per applied action as
//! its undo log.
//!
//! [`Board::apply`] replays an action and [`Board::inverse`] computes, from
//! the board *before* an action, the actions that undo it. For every action
//! `a` and board `b`:
//!
//! ```
//! use rust_boardplay::core::{Action, Board, Color, Piece, Position};
//!
//! let mut board = Board::rect(3, 3);
//! board.put(Position::new(0, 0), Piece::new(0, Color::new(0)));
//!
//! let action = Action::jump(Position::new(0, 0), Position::new(2, 2));
//! let undo = board.inverse(&action);
//!
//! let mut after = board.clone();
//! after.apply(&action);
//! after.apply_all(&undo);
//! assert_eq!(after, board);
//! ```

use std::collections::BTreeMap;

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::{Action, Positions};
use super::piece::Piece;
use super::position::Position;

/// Valid cells and the pieces on them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: OrdSet<Position>,
    pieces: OrdMap<Position, Piece>,
}

impl Board {
    /// Create an empty board over the given cells.
    pub fn new(cells: impl IntoIterator<Item = Position>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            pieces: OrdMap::new(),
        }
    }

    /// Create an empty rectangular board with `rows * cols` cells.
    #[must_use]
    pub fn rect(rows: i32, cols: i32) -> Self {
        Self::new((0..rows).flat_map(|r| (0..cols).map(move |c| Position::new(r, c))))
    }

    /// Check if a position is a cell of this board.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// The piece on a cell, if any.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.pieces.get(&pos).copied()
    }

    /// Put a piece on a cell, returning the piece it replaced.
    pub fn put(&mut self, pos: Position, piece: Piece) -> Option<Piece> {
        self.pieces.insert(pos, piece)
    }

    /// Clear a cell, returning the piece that stood there.
    pub fn clear(&mut self, pos: Position) -> Option<Piece> {
        self.pieces.remove(&pos)
    }

    /// Iterate over all cells in order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    /// Iterate over occupied cells in order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces.iter().map(|(pos, piece)| (*pos, *piece))
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the board has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Replay one action.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Add { piece, pos } => {
                self.pieces.insert(*pos, *piece);
            }
            Action::Remove { positions } => {
                for pos in positions {
                    self.pieces.remove(pos);
                }
            }
            Action::Move {
                dir,
                steps,
                positions,
            } => {
                // Lift everything first so overlapping source/destination
                // cells do not clobber each other. A piece whose destination
                // is out of coordinate range leaves the board.
                let lifted: Vec<(Option<Position>, Piece)> = positions
                    .iter()
                    .filter_map(|pos| {
                        self.pieces
                            .remove(pos)
                            .map(|piece| (pos.offset(*dir, *steps), piece))
                    })
                    .collect();
                for (dest, piece) in lifted {
                    if let Some(dest) = dest {
                        self.pieces.insert(dest, piece);
                    }
                }
            }
            Action::Jump { from, to } => {
                if let Some(piece) = self.pieces.remove(from) {
                    self.pieces.insert(*to, piece);
                }
            }
            Action::Swap { piece, positions } => {
                for pos in positions {
                    self.pieces.insert(*pos, *piece);
                }
            }
        }
    }

    /// Replay a sequence of actions in order.
    pub fn apply_all<'a>(&mut self, actions: impl IntoIterator<Item = &'a Action>) {
        for action in actions {
            self.apply(action);
        }
    }

    /// Actions undoing `action`, computed on the board as it was before
    /// `action` was applied.
    ///
    /// Applying `action` and then the returned actions restores `self`.
    #[must_use]
    pub fn inverse(&self, action: &Action) -> Vec<Action> {
        match action {
            Action::Add { pos, .. } => match self.get(*pos) {
                None => vec![Action::remove(&[*pos])],
                Some(prev) => vec![Action::add(prev, *pos)],
            },
            Action::Remove { positions } => dedup(positions)
                .into_iter()
                .filter_map(|pos| self.get(pos).map(|prev| Action::add(prev, pos)))
                .collect(),
            Action::Move {
                dir,
                steps,
                positions,
            } => {
                let sources: Vec<Position> = dedup(positions)
                    .into_iter()
                    .filter(|pos| self.get(*pos).is_some())
                    .collect();
                if sources.is_empty() {
                    return Vec::new();
                }
                let mut dests = Vec::with_capacity(sources.len());
                let mut lost = Vec::new();
                for pos in &sources {
                    match pos.offset(*dir, *steps) {
                        Some(dest) => dests.push(dest),
                        None => lost.push(*pos),
                    }
                }

                let mut undo = Vec::new();
                if !dests.is_empty() {
                    undo.push(Action::move_pieces(dir.opposite(), *steps, &dests));
                }
                for dest in &dests {
                    if sources.contains(dest) {
                        continue;
                    }
                    if let Some(prev) = self.get(*dest) {
                        undo.push(Action::add(prev, *dest));
                    }
                }
                for pos in lost {
                    if let Some(prev) = self.get(pos) {
                        undo.push(Action::add(prev, pos));
                    }
                }
                undo
            }
            Action::Jump { from, to } => {
                if from == to || self.get(*from).is_none() {
                    return Vec::new();
                }
                let mut undo = vec![Action::jump(*to, *from)];
                if let Some(prev) = self.get(*to) {
                    undo.push(Action::add(prev, *to));
                }
                undo
            }
            Action::Swap { positions, .. } => {
                let mut by_prev: BTreeMap<Piece, Positions> = BTreeMap::new();
                let mut empty: Positions = SmallVec::new();
                for pos in dedup(positions) {
                    match self.get(pos) {
                        Some(prev) => by_prev.entry(prev).or_default().push(pos),
                        None => empty.push(pos),
                    }
                }

                let mut undo: Vec<Action> = by_prev
                    .into_iter()
                    .map(|(prev, cells)| Action::Swap {
                        piece: prev,
                        positions: cells,
                    })
                    .collect();
                if !empty.is_empty() {
                    undo.push(Action::Remove { positions: empty });
                }
                undo
            }
        }
    }
}

fn dedup(positions: &[Position]) -> Vec<Position> {
    let mut seen = Vec::with_capacity(positions.len());
    for pos in positions {
        if !seen.contains(pos) {
            seen.push(*pos);
        }
    }
    seen
}
