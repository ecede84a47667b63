//! Tic-tac-toe, the bundled reference game.
//!
//! - two seats; seat 0 places first
//! - every move is a single `Add` of the mover's mark on an empty cell
//! - three in a row wins, a full board draws
//! - an invalid move or a resignation hands the win to the other seat

mod game;

pub use game::{TicTacToe, TicTacToeFactory};
