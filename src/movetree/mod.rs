//! Move tree and interactive move chooser.
//!
//! ## Overview
//!
//! A rules engine exposes the valid moves of a turn as a flat set, each
//! move a list of atomic actions. A human builds one move by clicking, one
//! step at a time. This module bridges the two:
//!
//! - [`MoveTree`] merges the common action prefixes of all valid moves into
//!   a prefix tree whose edges are sub-moves;
//! - [`MoveChooser`] walks that tree with a cursor, matches clicked board
//!   positions against the next sub-moves, replays them on a private board
//!   and undoes them with exact inverse actions;
//! - [`MoveWaiter`] is how a waiting player receives the finished move.

pub mod chooser;
pub mod node;
pub mod tree;

pub use chooser::{MoveChooser, MoveWaiter};
pub use node::{MoveNode, NodeId};
pub use tree::{MoveTree, TreeStats};
