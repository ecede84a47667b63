//! Board coordinates and directions.

use serde::{Deserialize, Serialize};

/// A board cell, addressed by row and column.
///
/// Rows grow upward: `Dir::Up` increases `row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The position `steps` cells away in direction `dir`, or `None` when
    /// that lies outside the `i32` coordinate range.
    #[must_use]
    pub fn offset(self, dir: Dir, steps: u32) -> Option<Self> {
        let steps = i32::try_from(steps).ok()?;
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add(dr.checked_mul(steps)?)?;
        let col = self.col.checked_add(dc.checked_mul(steps)?)?;
        Some(Self::new(row, col))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The eight board directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Dir {
    /// All directions, in declaration order.
    pub const ALL: [Dir; 8] = [
        Dir::Up,
        Dir::Down,
        Dir::Left,
        Dir::Right,
        Dir::UpLeft,
        Dir::UpRight,
        Dir::DownLeft,
        Dir::DownRight,
    ];

    /// `(row, col)` change of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (1, 0),
            Dir::Down => (-1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
            Dir::UpLeft => (1, -1),
            Dir::UpRight => (1, 1),
            Dir::DownLeft => (-1, -1),
            Dir::DownRight => (-1, 1),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
            Dir::UpLeft => Dir::DownRight,
            Dir::UpRight => Dir::DownLeft,
            Dir::DownLeft => Dir::UpRight,
            Dir::DownRight => Dir::UpLeft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let p = Position::new(2, 2);
        assert_eq!(p.offset(Dir::Up, 1), Some(Position::new(3, 2)));
        assert_eq!(p.offset(Dir::DownLeft, 2), Some(Position::new(0, 0)));
        assert_eq!(p.offset(Dir::Right, 0), Some(p));
    }

    #[test]
    fn test_opposite_round_trip() {
        for dir in Dir::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let p = Position::new(5, 5);
            let there = p.offset(dir, 3).unwrap();
            assert_eq!(there.offset(dir.opposite(), 3), Some(p));
        }
    }

    #[test]
    fn test_offset_out_of_range() {
        let p = Position::new(1, 0);

        assert_eq!(p.offset(Dir::Up, u32::MAX), None);
        assert_eq!(p.offset(Dir::Up, i32::MAX as u32), None);
        assert_eq!(p.offset(Dir::Down, i32::MAX as u32), Some(Position::new(1 - i32::MAX, 0)));
        assert_eq!(Position::new(i32::MIN, 0).offset(Dir::Down, 1), None);
        assert_eq!(p.offset(Dir::Left, u32::MAX), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Position::new(-1, 7)), "(-1,7)");
    }
}
