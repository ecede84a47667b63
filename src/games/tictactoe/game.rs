//! Tic-tac-toe rules engine and factory.

use std::time::Duration;

use crate::core::{Action, Board, Color, Move, Piece, PlayerId, Position};
use crate::error::{Error, Result};
use crate::rules::{GameFactory, GameResult, GameRuler, Mechanics, Param};

const SIZE: i32 = 3;
const SEATS: usize = 2;

/// The eight winning lines as (start, step) pairs.
const LINES: [((i32, i32), (i32, i32)); 8] = [
    ((0, 0), (0, 1)),
    ((1, 0), (0, 1)),
    ((2, 0), (0, 1)),
    ((0, 0), (1, 0)),
    ((0, 1), (1, 0)),
    ((0, 2), (1, 0)),
    ((0, 0), (1, 1)),
    ((0, 2), (1, -1)),
];

/// Tic-tac-toe on a 3x3 board. Seat 0 moves first.
#[derive(Clone, Debug)]
pub struct TicTacToe {
    names: Vec<String>,
    board: Board,
    turn: PlayerId,
    outcome: Option<GameResult>,
    mechanics: Mechanics,
}

impl TicTacToe {
    /// Create a game at the starting position.
    pub fn new(names: Vec<String>, time_limit: Option<Duration>) -> Self {
        Self {
            names,
            board: Board::rect(SIZE, SIZE),
            turn: PlayerId::new(0),
            outcome: None,
            mechanics: Mechanics {
                time_limit,
                pieces: PlayerId::all(SEATS).map(Self::piece).collect(),
            },
        }
    }

    /// The mark of a seat.
    #[must_use]
    pub fn piece(player: PlayerId) -> Piece {
        Piece::new(0, Color::new(player.seat()))
    }

    fn line_owner(&self, start: (i32, i32), step: (i32, i32)) -> Option<Piece> {
        let cells: Vec<Option<Piece>> = (0..SIZE)
            .map(|i| self.board.get(Position::new(start.0 + i * step.0, start.1 + i * step.1)))
            .collect();
        let first = cells[0]?;
        cells.iter().all(|c| *c == Some(first)).then_some(first)
    }

    fn settle(&mut self) {
        let mover = Self::piece(self.turn);
        if LINES.iter().any(|&(start, step)| self.line_owner(start, step) == Some(mover)) {
            self.outcome = Some(GameResult::Winner(self.turn));
        } else if self.board.piece_count() == self.board.len() {
            self.outcome = Some(GameResult::Draw);
        } else {
            self.turn = self.turn.next(SEATS);
        }
    }
}

impl GameRuler for TicTacToe {
    fn name(&self) -> &str {
        TicTacToeFactory::NAME
    }

    fn players(&self) -> &[String] {
        &self.names
    }

    fn color(&self, player: &str) -> Option<Color> {
        self.player_index(player).map(|p| Self::piece(p).color)
    }

    fn board(&self) -> Board {
        self.board.clone()
    }

    fn turn(&self) -> Option<PlayerId> {
        self.outcome.is_none().then_some(self.turn)
    }

    fn valid_moves(&self) -> Vec<Move> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        let piece = Self::piece(self.turn);
        self.board
            .cells()
            .filter(|&pos| self.board.get(pos).is_none())
            .map(|pos| Move::play([Action::add(piece, pos)]))
            .collect()
    }

    fn apply_move(&mut self, mv: &Move) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        if *mv == Move::Resign {
            self.outcome = Some(GameResult::forfeit(self.turn, SEATS));
            return true;
        }
        if !self.is_valid(mv) {
            self.outcome = Some(GameResult::forfeit(self.turn, SEATS));
            return false;
        }
        self.board.apply_all(mv.actions());
        self.settle();
        true
    }

    fn result(&self) -> Option<GameResult> {
        self.outcome.clone()
    }

    fn mechanics(&self) -> &Mechanics {
        &self.mechanics
    }

    fn copy(&self) -> Box<dyn GameRuler> {
        Box::new(self.clone())
    }
}

/// Builds [`TicTacToe`] games. The `time` parameter sets the per-move limit.
pub struct TicTacToeFactory {
    params: Vec<Param>,
    names: Vec<String>,
}

impl TicTacToeFactory {
    pub const NAME: &'static str = "tictactoe";

    #[must_use]
    pub fn new() -> Self {
        Self {
            params: vec![Param::new(
                "time",
                "Time per move",
                &["none", "100ms", "1s", "5s", "30s"],
            )],
            names: Vec::new(),
        }
    }

    fn time_limit(&self) -> Result<Option<Duration>> {
        let value = self
            .params
            .iter()
            .find(|p| p.name() == "time")
            .map_or("none", Param::value);
        parse_time(value).ok_or_else(|| Error::InvalidParam {
            param: "time".to_string(),
            value: value.to_string(),
            allowed: "none|<n>ms|<n>s".to_string(),
        })
    }
}

impl Default for TicTacToeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFactory for TicTacToeFactory {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn min_players(&self) -> usize {
        SEATS
    }

    fn max_players(&self) -> usize {
        SEATS
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn params_mut(&mut self) -> &mut [Param] {
        &mut self.params
    }

    fn set_player_names(&mut self, names: &[String]) -> Result<()> {
        if names.len() != SEATS {
            return Err(Error::PlayerCount {
                game: Self::NAME.to_string(),
                players: names.len(),
            });
        }
        self.names = names.to_vec();
        Ok(())
    }

    fn new_game(&mut self) -> Result<Box<dyn GameRuler>> {
        if self.names.len() != SEATS {
            return Err(Error::Factory("player names not set".to_string()));
        }
        Ok(Box::new(TicTacToe::new(self.names.clone(), self.time_limit()?)))
    }
}

/// `"none"`, `"<n>ms"` or `"<n>s"`.
fn parse_time(value: &str) -> Option<Option<Duration>> {
    if value == "none" {
        return Some(None);
    }
    if let Some(ms) = value.strip_suffix("ms") {
        return ms.parse().ok().map(|ms| Some(Duration::from_millis(ms)));
    }
    value
        .strip_suffix('s')
        .and_then(|s| s.parse().ok())
        .map(|s| Some(Duration::from_secs(s)))
}
