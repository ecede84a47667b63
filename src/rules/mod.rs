//! Rules engine contract, factories and the factory registry.
//!
//! Games implement `GameRuler` (and a `GameFactory` producing it) to define
//! legal moves, how moves change the board, and when the match ends.
//! The move tree and the session call into these traits but never
//! interpret game-specific concepts directly.

pub mod engine;
pub mod factory;
pub mod registry;

pub use engine::{GameResult, GameRuler, Mechanics, Situation};
pub use factory::{GameFactory, Param, PlayerFactory};
pub use registry::Registry;
