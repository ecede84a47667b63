//! # rust-boardplay
//!
//! Interactive move construction and confined match sessions for board games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: Rules live behind the `GameRuler` trait. Neither the
//!    move tree nor the session interprets pieces, cells or moves.
//!
//! 2. **Moves Are Action Lists**: A move is a sequence of atomic board
//!    actions (`Add`, `Remove`, `Move`, `Jump`, `Swap`). A human builds one
//!    action at a time; the engine only sees complete moves.
//!
//! 3. **Untrusted Code Is Confined**: Players and engines need not be
//!    thread-safe. A session calls them from one worker thread, and a
//!    watchdog ends the match when a call overruns its budget.
//!
//! ## Architecture
//!
//! - **Move Tree**: the valid moves of a turn, merged into a prefix tree
//!   whose edges are sub-moves.
//!
//! - **Move Chooser**: cursor over the move tree, driven by board clicks,
//!   undoable through exact inverse actions on persistent board snapshots.
//!
//! - **Session**: one match at a time on a confinement worker, timed by a
//!   watchdog, reported to an `Observer`.
//!
//! ## Modules
//!
//! - `core`: positions, pieces, actions, moves, boards, players, RNG
//! - `rules`: `GameRuler` contract, factories, parameters, registry
//! - `movetree`: move tree builder and move chooser
//! - `session`: orchestrator, watchdog, confinement worker, observer
//! - `players`: `Player` contract, random and interactive players
//! - `games`: bundled tic-tac-toe
//! - `error`: crate error type

pub mod core;
pub mod error;
pub mod games;
pub mod movetree;
pub mod players;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{Action, Board, Color, Dir, Move, Piece, PlayerId, PlayerMap, Position};

pub use crate::error::{Error, Result};

pub use crate::movetree::{MoveChooser, MoveTree, MoveWaiter};

pub use crate::players::Player;

pub use crate::rules::{GameFactory, GameResult, GameRuler, PlayerFactory, Registry};

pub use crate::session::{MatchSetup, MatchState, Observer, Session, SessionConfig};
