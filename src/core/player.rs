//! Seats and per-seat storage.
//!
//! A match seats its players in the order the setup lists them; `PlayerId`
//! is that 0-based position. `PlayerMap` holds one value per seat, e.g. the
//! session's `PlayerMap<Box<dyn Player>>` or the interactive flags.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Upper bound on seats in one match.
pub const MAX_SEATS: usize = u8::MAX as usize;

/// 0-based seat of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat number as stored, for games that derive per-seat ids from it.
    #[must_use]
    pub const fn seat(self) -> u8 {
        self.0
    }

    /// Seat to move after this one in a `seats`-player match.
    #[must_use]
    pub fn next(self, seats: usize) -> Self {
        Self::from_index((self.index() + 1) % seats)
    }

    /// Every seat of a `seats`-player match, in turn order.
    ///
    /// ```
    /// use rust_boardplay::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(seats: usize) -> impl Iterator<Item = PlayerId> {
        (0..seats.min(MAX_SEATS)).map(Self::from_index)
    }

    fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_SEATS);
        Self(index as u8)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Dense seat-indexed storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// One value per seat, seat 0 first.
    ///
    /// # Panics
    ///
    /// If `seats` is empty or longer than [`MAX_SEATS`].
    pub fn from_vec(seats: Vec<T>) -> Self {
        assert!(!seats.is_empty(), "a match needs at least one seat");
        assert!(seats.len() <= MAX_SEATS, "too many seats: {}", seats.len());
        Self { seats }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.seats.get_mut(player.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter_mut())
    }
}

impl<T> FromIterator<T> for PlayerMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}
