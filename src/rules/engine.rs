//! Rules engine contract for game implementations.
//!
//! Games implement `GameRuler` to define:
//! - whose turn it is and which full moves are valid
//! - how a move changes the authoritative board
//! - when the match is over and who won
//!
//! The session and the move tree call into `GameRuler` but never interpret
//! game-specific concepts.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Board, Color, Move, Piece, PlayerId};

/// How a finished match ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
    Draw,
    /// Shared win, e.g. every seat but one that forfeited.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Seats credited with the win; empty for a draw.
    #[must_use]
    pub fn winners(&self) -> &[PlayerId] {
        match self {
            Self::Winner(seat) => std::slice::from_ref(seat),
            Self::Draw => &[],
            Self::Winners(seats) => seats.as_slice(),
        }
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners().contains(&player)
    }

    /// Result awarding the match to everyone except `offender`.
    ///
    /// ```
    /// use rust_boardplay::core::PlayerId;
    /// use rust_boardplay::rules::GameResult;
    ///
    /// assert_eq!(GameResult::forfeit(PlayerId::new(0), 2), GameResult::Winner(PlayerId::new(1)));
    /// ```
    #[must_use]
    pub fn forfeit(offender: PlayerId, player_count: usize) -> Self {
        let mut others: Vec<PlayerId> = PlayerId::all(player_count)
            .filter(|p| *p != offender)
            .collect();
        match others.len() {
            0 => Self::Draw,
            1 => Self::Winner(others.remove(0)),
            _ => Self::Winners(others),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winners() {
            [] => f.write_str("draw"),
            [only] => write!(f, "{only} wins"),
            many => {
                let names: Vec<_> = many.iter().map(ToString::to_string).collect();
                write!(f, "{} win", names.join(", "))
            }
        }
    }
}

/// Static facts about a game that do not change during a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanics {
    /// Time a player may take per move. `None` means untimed.
    pub time_limit: Option<Duration>,

    /// Every piece that can appear on the board.
    pub pieces: Vec<Piece>,
}

/// A board plus whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    pub board: Board,
    pub turn: Option<PlayerId>,
}

/// Authoritative rules engine for one game instance.
///
/// ## Contract
///
/// - `turn`: `None` once the match is over
/// - `valid_moves`: every full move the player on turn may make, including
///   `Move::Pass` when passing is allowed; empty when the match is over
/// - `apply_move`: returns `false` for a move that is not valid. The engine
///   should then record the forfeit so that `result` names the winners.
///   `Move::Resign` is always accepted and ends the match
/// - `result`: `None` while the match continues
/// - `copy`: an independent deep copy; players and observers get their own
pub trait GameRuler: Send {
    /// Game name, e.g. "Tic-tac-toe".
    fn name(&self) -> &str;

    /// Player names, seat 0 first.
    fn players(&self) -> &[String];

    /// Color of the pieces of the named player.
    fn color(&self, player: &str) -> Option<Color>;

    /// Current board.
    fn board(&self) -> Board;

    /// Player on turn, `None` when the match is over.
    fn turn(&self) -> Option<PlayerId>;

    /// All valid moves for the player on turn.
    fn valid_moves(&self) -> Vec<Move>;

    /// Play a move for the player on turn.
    fn apply_move(&mut self, mv: &Move) -> bool;

    /// Final result, `None` while the match continues.
    fn result(&self) -> Option<GameResult>;

    /// Static game facts such as the per-move time limit.
    fn mechanics(&self) -> &Mechanics;

    /// Independent copy of this engine.
    fn copy(&self) -> Box<dyn GameRuler>;

    /// Current board and turn.
    fn situation(&self) -> Situation {
        Situation {
            board: self.board(),
            turn: self.turn(),
        }
    }

    /// Check whether a move is valid for the player on turn.
    fn is_valid(&self, mv: &Move) -> bool {
        match mv {
            Move::Resign => self.turn().is_some(),
            _ => self.valid_moves().contains(mv),
        }
    }

    /// Seat of the named player.
    fn player_index(&self, name: &str) -> Option<PlayerId> {
        self.players()
            .iter()
            .position(|p| p == name)
            .map(|i| PlayerId::new(i as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winners_of_each_outcome() {
        let seat = PlayerId::new;

        assert_eq!(GameResult::Winner(seat(1)).winners(), &[seat(1)]);
        assert!(GameResult::Draw.winners().is_empty());
        assert!(!GameResult::Draw.is_winner(seat(0)));

        let shared = GameResult::Winners(vec![seat(0), seat(2)]);
        assert!(shared.is_winner(seat(2)));
        assert!(!shared.is_winner(seat(1)));
    }

    #[test]
    fn test_forfeit() {
        assert_eq!(
            GameResult::forfeit(PlayerId::new(1), 3),
            GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)])
        );
        assert_eq!(GameResult::forfeit(PlayerId::new(0), 1), GameResult::Draw);
    }

    #[test]
    fn test_result_text() {
        assert_eq!(GameResult::Winner(PlayerId::new(0)).to_string(), "Player 0 wins");
        assert_eq!(GameResult::Draw.to_string(), "draw");
        assert_eq!(
            GameResult::forfeit(PlayerId::new(0), 3).to_string(),
            "Player 1, Player 2 win"
        );
    }
}
