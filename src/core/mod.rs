//! Core vocabulary: positions, pieces, actions, moves, boards, players, RNG.
//!
//! These types are game-agnostic. A rules engine builds its moves from
//! `Action`s; the move tree and the session only compare and replay them.

pub mod action;
pub mod board;
pub mod moves;
pub mod piece;
pub mod player;
pub mod position;
pub mod rng;

pub use action::{Action, Positions};
pub use board::Board;
pub use moves::Move;
pub use piece::{Color, Piece};
pub use player::{PlayerId, PlayerMap, MAX_SEATS};
pub use position::{Dir, Position};
pub use rng::GameRng;
