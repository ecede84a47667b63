//! Factories producing rules engines and players, and their parameters.
//!
//! A session calls each factory once while initializing a match, on the
//! confinement worker and under the watchdog.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::players::Player;

use super::engine::GameRuler;

/// A named parameter whose value is one of a fixed list of strings.
///
/// ```
/// use rust_boardplay::rules::Param;
///
/// let mut time = Param::new("time", "Time per move", &["none", "1s", "5s"]);
/// assert_eq!(time.value(), "none");
/// time.set("5s").unwrap();
/// assert_eq!(time.value(), "5s");
/// assert!(time.set("forever").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    name: String,
    prompt: String,
    values: Vec<String>,
    selected: usize,
}

impl Param {
    /// Create a parameter; the first value is the default.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(name: impl Into<String>, prompt: impl Into<String>, values: &[&str]) -> Self {
        assert!(!values.is_empty(), "A parameter needs at least one value");
        Self {
            name: name.into(),
            prompt: prompt.into(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
            selected: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// All allowed values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Currently selected value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.values[self.selected]
    }

    /// Select a value, rejecting anything outside the allowed list.
    pub fn set(&mut self, value: &str) -> Result<()> {
        match self.values.iter().position(|v| v == value) {
            Some(index) => {
                self.selected = index;
                Ok(())
            }
            None => Err(Error::InvalidParam {
                param: self.name.clone(),
                value: value.to_string(),
                allowed: self.values.join("|"),
            }),
        }
    }
}

/// Produces fresh rules engines for one game.
pub trait GameFactory: Send {
    /// Game name, used for registry lookups.
    fn name(&self) -> &str;

    /// Smallest supported number of players.
    fn min_players(&self) -> usize;

    /// Largest supported number of players.
    fn max_players(&self) -> usize;

    /// Game parameters.
    fn params(&self) -> &[Param];

    /// Game parameters, mutably.
    fn params_mut(&mut self) -> &mut [Param];

    /// Names of the players of the next game, seat 0 first.
    fn set_player_names(&mut self, names: &[String]) -> Result<()>;

    /// Create a new engine at the starting position.
    fn new_game(&mut self) -> Result<Box<dyn GameRuler>>;

    /// Set a parameter by name.
    fn set_param(&mut self, name: &str, value: &str) -> Result<()> {
        self.params_mut()
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::UnknownParam(name.to_string()))?
            .set(value)
    }
}

/// Produces players of one kind.
pub trait PlayerFactory: Send {
    /// Factory name, used for registry lookups.
    fn name(&self) -> &str;

    /// Player parameters.
    fn params(&self) -> &[Param] {
        &[]
    }

    /// Create a player named `name` for the game named `game`.
    fn new_player(&mut self, game: &str, name: &str) -> Result<Box<dyn Player>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_default_and_set() {
        let mut param = Param::new("size", "Board size", &["3", "4"]);

        assert_eq!(param.name(), "size");
        assert_eq!(param.prompt(), "Board size");
        assert_eq!(param.value(), "3");
        param.set("4").unwrap();
        assert_eq!(param.value(), "4");
    }

    #[test]
    fn test_param_rejects_unknown_value() {
        let mut param = Param::new("size", "Board size", &["3", "4"]);

        let err = param.set("9").unwrap_err();
        assert!(matches!(err, Error::InvalidParam { .. }));
        assert_eq!(param.value(), "3");
    }

    #[test]
    #[should_panic(expected = "at least one value")]
    fn test_param_needs_values() {
        let _ = Param::new("empty", "Nothing", &[]);
    }
}
