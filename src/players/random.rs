//! Uniformly random player.

use tracing::{debug, warn};

use super::Player;
use crate::core::{GameRng, Move, PlayerId};
use crate::error::Result;
use crate::rules::{GameRuler, PlayerFactory};

/// Plays a uniformly random valid move. Deterministic for a given seed and
/// name.
pub struct RandomPlayer {
    name: String,
    rng: GameRng,
    game: Option<Box<dyn GameRuler>>,
}

impl RandomPlayer {
    #[must_use]
    pub fn new(name: impl Into<String>, rng: GameRng) -> Self {
        Self {
            name: name.into(),
            rng,
            game: None,
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_game(&mut self, game: Box<dyn GameRuler>) {
        self.game = Some(game);
    }

    fn get_move(&mut self) -> Move {
        let Some(game) = &self.game else {
            warn!(player = %self.name, "asked to move before receiving a game");
            return Move::Resign;
        };
        let moves = game.valid_moves();
        match self.rng.choose(&moves) {
            Some(mv) => mv.clone(),
            None => Move::Resign,
        }
    }

    fn moved(&mut self, player: PlayerId, mv: &Move) {
        if let Some(game) = &mut self.game {
            if !game.apply_move(mv) {
                debug!(player = %self.name, mover = %player, %mv, "own copy rejected move");
            }
        }
    }
}

/// Builds [`RandomPlayer`]s. Each player's RNG derives from the factory seed
/// and the player's name.
pub struct RandomPlayerFactory {
    rng: GameRng,
}

impl RandomPlayerFactory {
    pub const NAME: &'static str = "random";

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl PlayerFactory for RandomPlayerFactory {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn new_player(&mut self, game: &str, name: &str) -> Result<Box<dyn Player>> {
        let rng = self.rng.for_context(&format!("{game}/{name}"));
        Ok(Box::new(RandomPlayer::new(name, rng)))
    }
}
