//! Match event sink.

use crate::core::{Move, PlayerId};
use crate::rules::{GameResult, GameRuler};

/// Receives the events of a running match.
///
/// Every callback runs on the session's confinement worker, one at a time,
/// in match order: `set_game`, then one `moved` per turn, then either
/// `match_over` or (`limit_break` and) `interrupted`.
///
/// Callbacks must return promptly; they are timed like any other guarded
/// call.
pub trait Observer: Send + Sync {
    /// A private copy of the rules engine at the starting position.
    fn set_game(&self, game: Box<dyn GameRuler>);

    /// `player` made `mv`, already applied to the authoritative engine.
    fn moved(&self, player: PlayerId, mv: &Move);

    /// A guarded call exceeded its budget. `player` is `None` when the
    /// rules engine or a factory was at fault.
    fn limit_break(&self, player: Option<PlayerId>, message: &str);

    /// The match ended abnormally and will not continue.
    fn interrupted(&self, message: &str);

    /// The match ended with a result.
    fn match_over(&self, _result: &GameResult) {}
}
