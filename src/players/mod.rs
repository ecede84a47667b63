//! Player contract and the bundled player kinds.
//!
//! A player keeps its own copy of the rules engine, handed over by
//! `set_game`, and follows the match through `moved`. It is only ever called
//! from the session's confinement worker, so implementations need `Send` but
//! not `Sync`.

pub mod interactive;
pub mod random;

pub use interactive::{InteractivePlayer, InteractivePlayerFactory};
pub use random::{RandomPlayer, RandomPlayerFactory};

use crate::core::{Move, PlayerId};
use crate::rules::GameRuler;
use crate::session::ThreadLimits;

/// One participant of a match.
pub trait Player: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Private copy of the rules engine at the starting position.
    fn set_game(&mut self, game: Box<dyn GameRuler>);

    /// Pick a move for the current turn. May block.
    fn get_move(&mut self) -> Move;

    /// `player` made `mv`. Called for every move, including this player's.
    fn moved(&mut self, player: PlayerId, mv: &Move);

    /// Threading resources this player may use.
    fn threads(&mut self, _limits: ThreadLimits) {}

    /// Driven by a human; the session then skips the minimum turn duration.
    fn is_interactive(&self) -> bool {
        false
    }
}
