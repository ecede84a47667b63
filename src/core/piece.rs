//! Piece identifiers.
//!
//! The engine never interprets pieces: a game assigns meaning to each
//! `species` and `Color` value, the move tree only compares them.

use serde::{Deserialize, Serialize};

/// Opaque color identifier. Games decide what each value means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Color(pub u8);

impl Color {
    /// Create a new color.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }
}

/// A piece kind owned by a color, e.g. "white pawn" or "black disc".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece {
    pub species: u8,
    pub color: Color,
}

impl Piece {
    /// Create a new piece.
    #[must_use]
    pub const fn new(species: u8, color: Color) -> Self {
        Self { species, color }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({}/{})", self.species, self.color.0)
    }
}
