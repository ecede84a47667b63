//! Confined, watchdog-guarded match sessions.
//!
//! ## Threads
//!
//! - the caller: `Session::start_match` and `Session::stop` only flip state
//!   and queue work, they never call into players or engines;
//! - the confinement worker: runs the whole match, and every `Observer`
//!   callback;
//! - the watchdog: times each guarded call and ends the match when one
//!   overruns.

pub mod config;
pub mod confinement;
pub mod observer;
pub mod orchestrator;
pub mod watchdog;

pub use config::{SessionConfig, ThreadLimits};
pub use confinement::ConfinementWorker;
pub use observer::Observer;
pub use orchestrator::{MatchState, Session};
pub use watchdog::{WatchToken, Watchdog};

use crate::rules::{GameFactory, PlayerFactory};

/// What to play: a game factory and one entry per seat, seat 0 first.
pub struct MatchSetup {
    pub game: Box<dyn GameFactory>,
    pub players: Vec<PlayerSetup>,
}

/// One seat of a match: the player's name and the factory building it.
pub struct PlayerSetup {
    pub name: String,
    pub factory: Box<dyn PlayerFactory>,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, factory: Box<dyn PlayerFactory>) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }
}
