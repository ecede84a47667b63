//! Bundled game implementations.

pub mod tictactoe;
