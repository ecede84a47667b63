//! Session configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-match timing and threading configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Grace added to the game's per-move time limit (default: 1000 ms).
    pub tolerance_ms: u64,

    /// Budget for every other guarded call (0 = untimed).
    /// Covers factories, notifications and rules-engine queries.
    pub call_timeout_ms: u64,

    /// Minimum wall-clock duration of a non-interactive turn (0 = none).
    /// Lets a viewer follow engine-vs-engine matches.
    pub min_turn_ms: u64,

    /// Extra threads a player may start for its own search.
    pub max_extra_threads: usize,

    /// Size of a thread pool shared by all players.
    pub shared_pool_size: usize,

    /// Size of the pool for background work between turns.
    pub background_pool_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: 1000,
            call_timeout_ms: 10_000,
            min_turn_ms: 0,
            max_extra_threads: 0,
            shared_pool_size: 1,
            background_pool_size: 1,
        }
    }
}

impl SessionConfig {
    /// Set the per-move tolerance.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance_ms = millis(tolerance);
        self
    }

    /// Set the budget for non-move calls; zero disables it.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_ms = millis(timeout);
        self
    }

    /// Set the minimum turn duration.
    pub fn with_min_turn(mut self, min_turn: Duration) -> Self {
        self.min_turn_ms = millis(min_turn);
        self
    }

    /// Set the thread limits handed to every player.
    pub fn with_thread_limits(mut self, limits: ThreadLimits) -> Self {
        self.max_extra_threads = limits.max_extra;
        self.shared_pool_size = limits.shared_pool;
        self.background_pool_size = limits.background_pool;
        self
    }

    #[must_use]
    pub fn tolerance(&self) -> Duration {
        Duration::from_millis(self.tolerance_ms)
    }

    /// Budget for non-move calls, `None` when untimed.
    #[must_use]
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
    }

    #[must_use]
    pub fn min_turn(&self) -> Duration {
        Duration::from_millis(self.min_turn_ms)
    }

    /// Budget for `get_move` given the game's per-move time limit.
    #[must_use]
    pub fn move_budget(&self, time_limit: Option<Duration>) -> Option<Duration> {
        time_limit.map(|limit| limit + self.tolerance())
    }

    #[must_use]
    pub fn thread_limits(&self) -> ThreadLimits {
        ThreadLimits {
            max_extra: self.max_extra_threads,
            shared_pool: self.shared_pool_size,
            background_pool: self.background_pool_size,
        }
    }
}

/// Threading resources a player may use, passed to `Player::threads`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadLimits {
    pub max_extra: usize,
    pub shared_pool: usize,
    pub background_pool: usize,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
