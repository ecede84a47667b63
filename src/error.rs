//! Error types for rust-boardplay.
//!
//! Usage errors (misusing a `MoveChooser`, starting a second match) surface
//! here. Timeouts and protocol violations inside a running match never do:
//! they are reported through the session `Observer`.

use thiserror::Error;

use crate::core::Position;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("move chooser already used")]
    ChooserUsed,

    #[error("selection must contain at least one position")]
    EmptySelection,

    #[error("position {0} selected more than once")]
    DuplicatePosition(Position),

    #[error("position {0} is not on the board")]
    UnknownPosition(Position),

    #[error("current node is not a complete move")]
    NotFinal,

    #[error("passing is not a valid move")]
    PassNotAllowed,

    #[error("a match is already in progress")]
    MatchInProgress,

    #[error("match setup needs at least one player")]
    NoPlayers,

    #[error("no {kind} factory named '{name}'")]
    UnknownFactory { kind: &'static str, name: String },

    #[error("invalid value '{value}' for parameter '{param}' (allowed: {allowed})")]
    InvalidParam {
        param: String,
        value: String,
        allowed: String,
    },

    #[error("no parameter named '{0}'")]
    UnknownParam(String),

    #[error("game '{game}' does not support {players} players")]
    PlayerCount { game: String, players: usize },

    #[error("factory failed: {0}")]
    Factory(String),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("confinement worker is not accepting jobs")]
    WorkerGone,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
