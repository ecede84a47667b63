//! Name-based lookup of game and player factories.
//!
//! How to register a factory:
//!
//! 1) Implement `GameFactory` or `PlayerFactory` for your type.
//! 2) Register a constructor under the factory's name.
//! 3) Build match setups with [`Registry::setup`].
//!
//! Constructors are closures so a factory can capture what it needs, for
//! example the channel an interactive player hands its choosers to.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::session::{MatchSetup, PlayerSetup};

use super::factory::{GameFactory, PlayerFactory};

type MakeGame = Box<dyn Fn() -> Box<dyn GameFactory> + Send + Sync>;
type MakePlayer = Box<dyn Fn() -> Box<dyn PlayerFactory> + Send + Sync>;

/// Registered factory constructors, keyed by name.
#[derive(Default)]
pub struct Registry {
    games: FxHashMap<String, MakeGame>,
    players: FxHashMap<String, MakePlayer>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game factory constructor, replacing one with the same name.
    pub fn register_game(
        &mut self,
        name: impl Into<String>,
        make: impl Fn() -> Box<dyn GameFactory> + Send + Sync + 'static,
    ) {
        self.games.insert(name.into(), Box::new(make));
    }

    /// Register a player factory constructor, replacing one with the same name.
    pub fn register_player(
        &mut self,
        name: impl Into<String>,
        make: impl Fn() -> Box<dyn PlayerFactory> + Send + Sync + 'static,
    ) {
        self.players.insert(name.into(), Box::new(make));
    }

    /// Registered game names, sorted.
    #[must_use]
    pub fn game_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.games.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered player factory names, sorted.
    #[must_use]
    pub fn player_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.players.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct a fresh game factory by name.
    pub fn game(&self, name: &str) -> Result<Box<dyn GameFactory>> {
        self.games
            .get(name)
            .map(|make| make())
            .ok_or_else(|| Error::UnknownFactory {
                kind: "game",
                name: name.to_string(),
            })
    }

    /// Construct a fresh player factory by name.
    pub fn player(&self, name: &str) -> Result<Box<dyn PlayerFactory>> {
        self.players
            .get(name)
            .map(|make| make())
            .ok_or_else(|| Error::UnknownFactory {
                kind: "player",
                name: name.to_string(),
            })
    }

    /// Build a match setup from a game name and `(factory, player name)`
    /// pairs, seat 0 first.
    pub fn setup(&self, game: &str, players: &[(&str, &str)]) -> Result<MatchSetup> {
        let game = self.game(game)?;
        let players = players
            .iter()
            .map(|(factory, name)| {
                Ok(PlayerSetup {
                    name: (*name).to_string(),
                    factory: self.player(factory)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MatchSetup { game, players })
    }
}
