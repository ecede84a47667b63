//! Match orchestration on a confinement worker under a watchdog.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──start_match──▶ Initializing ──▶ Running ──▶ Finished
//!                            │              │
//!                            └──────────────┴──▶ Stopped
//! ```
//!
//! `start_match` only queues the match on the worker. Initialization and the
//! turn loop then run there, every call into a player, the rules engine, a
//! factory or the observer wrapped by [`Inner::guarded`]:
//!
//! 1. check that the match is still current and arm the watchdog with the
//!    call's budget (if any), both under the control lock so a late worker
//!    can never replace a newer match's countdown;
//! 2. run the call;
//! 3. disarm; a `false` from disarm means the watchdog already fired and the
//!    match belongs to the timeout path now;
//! 4. re-check that this match is still the current active one.
//!
//! A timeout runs on the watchdog thread. If the match is still current it
//! becomes Stopped, the stuck worker is abandoned for a fresh one, and the
//! fresh worker reports `limit_break` then `interrupted` to the observer.
//! Each match carries a generation number so a late timeout or a late
//! return from an abandoned worker can never touch a newer match.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::confinement::ConfinementWorker;
use super::observer::Observer;
use super::watchdog::{WatchToken, Watchdog};
use super::{MatchSetup, PlayerSetup};
use crate::core::{PlayerId, PlayerMap, MAX_SEATS};
use crate::error::{Error, Result};
use crate::players::Player;
use crate::rules::{GameFactory, GameResult, GameRuler};

/// Where the session's current (or last) match stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// No match started yet.
    Idle,
    /// Players and rules engine are being set up.
    Initializing,
    /// Turns are being played.
    Running,
    /// The match ended with a result.
    Finished,
    /// The match was stopped, timed out, or failed to initialize.
    Stopped,
}

impl MatchState {
    /// Check if a match is in progress.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, MatchState::Initializing | MatchState::Running)
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchState::Idle => "idle",
            MatchState::Initializing => "initializing",
            MatchState::Running => "running",
            MatchState::Finished => "finished",
            MatchState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Runs one match at a time with every untrusted call confined and timed.
///
/// ```no_run
/// use std::sync::Arc;
/// use rust_boardplay::games::tictactoe::TicTacToeFactory;
/// use rust_boardplay::players::RandomPlayerFactory;
/// use rust_boardplay::session::{MatchSetup, PlayerSetup, Session, SessionConfig};
/// # use rust_boardplay::session::Observer;
/// # struct Quiet;
/// # impl Observer for Quiet {
/// #     fn set_game(&self, _: Box<dyn rust_boardplay::rules::GameRuler>) {}
/// #     fn moved(&self, _: rust_boardplay::core::PlayerId, _: &rust_boardplay::core::Move) {}
/// #     fn limit_break(&self, _: Option<rust_boardplay::core::PlayerId>, _: &str) {}
/// #     fn interrupted(&self, _: &str) {}
/// # }
///
/// let session = Session::new(Arc::new(Quiet))?;
/// let setup = MatchSetup {
///     game: Box::new(TicTacToeFactory::new()),
///     players: vec![
///         PlayerSetup::new("alice", Box::new(RandomPlayerFactory::new(1))),
///         PlayerSetup::new("bob", Box::new(RandomPlayerFactory::new(2))),
///     ],
/// };
/// session.start_match(setup, SessionConfig::default())?;
/// # Ok::<(), rust_boardplay::error::Error>(())
/// ```
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    observer: Arc<dyn Observer>,
    control: Mutex<Control>,
    worker: Mutex<Option<ConfinementWorker>>,
    watchdog: Watchdog,
    workers_spawned: AtomicU64,
}

struct Control {
    state: MatchState,
    generation: u64,
    result: Option<GameResult>,
}

impl Control {
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.state.is_active()
    }
}

/// Everything a running match owns, living on the worker.
struct Table {
    ruler: Box<dyn GameRuler>,
    players: PlayerMap<Box<dyn Player>>,
    interactive: PlayerMap<bool>,
}

impl Session {
    /// Create a session reporting to `observer`, with its watchdog and first
    /// worker started.
    pub fn new(observer: Arc<dyn Observer>) -> Result<Self> {
        let inner = Inner {
            observer,
            control: Mutex::new(Control {
                state: MatchState::Idle,
                generation: 0,
                result: None,
            }),
            worker: Mutex::new(None),
            watchdog: Watchdog::spawn("boardplay-watchdog")?,
            workers_spawned: AtomicU64::new(0),
        };
        let worker = inner.spawn_worker()?;
        *inner.worker.lock() = Some(worker);
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Current match state.
    #[must_use]
    pub fn state(&self) -> MatchState {
        self.inner.control.lock().state
    }

    /// Result of the last match that finished normally.
    #[must_use]
    pub fn last_result(&self) -> Option<GameResult> {
        self.inner.control.lock().result.clone()
    }

    /// Queue a new match on the worker.
    ///
    /// Fails with `MatchInProgress` while another match is initializing or
    /// running. Everything after queuing is reported through the observer.
    pub fn start_match(&self, setup: MatchSetup, config: SessionConfig) -> Result<()> {
        if setup.players.is_empty() {
            return Err(Error::NoPlayers);
        }

        let mut control = self.inner.control.lock();
        if control.state.is_active() {
            return Err(Error::MatchInProgress);
        }
        let previous = control.state;
        control.generation += 1;
        control.state = MatchState::Initializing;
        control.result = None;
        let generation = control.generation;

        let inner = Arc::clone(&self.inner);
        let queued = self
            .inner
            .submit(move || inner.run_match(generation, setup, config));
        if let Err(err) = queued {
            control.state = previous;
            return Err(err);
        }

        info!(generation, "match queued");
        Ok(())
    }

    /// Stop the active match, abandoning the worker without waiting for it.
    ///
    /// Returns `true` iff a match was active.
    pub fn stop(&self) -> bool {
        self.inner.stop()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl Inner {
    fn spawn_worker(&self) -> Result<ConfinementWorker> {
        let n = self.workers_spawned.fetch_add(1, Ordering::Relaxed);
        ConfinementWorker::spawn(format!("boardplay-worker-{n}"))
    }

    /// Submit to the current worker, starting one if the last replacement
    /// failed.
    fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<()> {
        let mut slot = self.worker.lock();
        if slot.is_none() {
            *slot = Some(self.spawn_worker()?);
        }
        match slot.as_ref() {
            Some(worker) => worker.submit(job),
            None => Err(Error::WorkerGone),
        }
    }

    fn replace_worker(&self) {
        let fresh = match self.spawn_worker() {
            Ok(worker) => Some(worker),
            Err(err) => {
                error!(%err, "cannot start replacement worker");
                None
            }
        };
        let stale = std::mem::replace(&mut *self.worker.lock(), fresh);
        if let Some(stale) = stale {
            stale.abandon();
        }
    }

    fn stop(&self) -> bool {
        let mut control = self.control.lock();
        let was_active = control.state.is_active();
        self.watchdog.cancel();
        if was_active {
            control.state = MatchState::Stopped;
            self.replace_worker();
            info!(generation = control.generation, "match stopped");
        }
        was_active
    }

    /// Stop for good: abandon the worker without a replacement and end the
    /// watchdog thread.
    fn teardown(&self) {
        {
            let mut control = self.control.lock();
            self.watchdog.cancel();
            if control.state.is_active() {
                control.state = MatchState::Stopped;
                info!(generation = control.generation, "match stopped by teardown");
            }
            if let Some(worker) = self.worker.lock().take() {
                worker.abandon();
            }
        }
        self.watchdog.shutdown();
    }

    fn is_current(&self, generation: u64) -> bool {
        self.control.lock().is_current(generation)
    }

    /// Arm the watchdog for a call of `generation`, or refuse with `None` if
    /// that match is no longer current.
    fn arm_current(
        self: &Arc<Self>,
        generation: u64,
        budget: Duration,
        culprit: Option<PlayerId>,
        what: &str,
    ) -> Option<WatchToken> {
        let control = self.control.lock();
        if !control.is_current(generation) {
            return None;
        }
        let session = Arc::downgrade(self);
        let message = match culprit {
            Some(player) => format!("{player}: {what} exceeded {} ms", budget.as_millis()),
            None => format!("{what} exceeded {} ms", budget.as_millis()),
        };
        Some(self.watchdog.arm(budget, move || {
            if let Some(session) = session.upgrade() {
                session.on_timeout(generation, culprit, message);
            }
        }))
    }

    /// Run `call` under the watchdog. `None` means the match is over for this
    /// worker: it timed out, was stopped, panicked or was superseded.
    fn guarded<T>(
        self: &Arc<Self>,
        generation: u64,
        budget: Option<Duration>,
        culprit: Option<PlayerId>,
        what: &str,
        call: impl FnOnce() -> T,
    ) -> Option<T> {
        let token = match budget {
            Some(budget) => Some(self.arm_current(generation, budget, culprit, what)?),
            None if self.is_current(generation) => None,
            None => return None,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(call));

        if let Some(token) = token {
            if !self.watchdog.disarm(token) {
                debug!(generation, what, "call returned after its timeout fired");
                return None;
            }
        }
        match outcome {
            Ok(value) => self.is_current(generation).then_some(value),
            Err(_) => {
                self.abort(generation, format!("{what} panicked"));
                None
            }
        }
    }

    /// Watchdog expiry. Runs on the watchdog thread.
    fn on_timeout(&self, generation: u64, culprit: Option<PlayerId>, message: String) {
        let mut control = self.control.lock();
        if !control.is_current(generation) {
            debug!(generation, "stale timeout ignored");
            return;
        }
        control.state = MatchState::Stopped;
        warn!(generation, player = ?culprit, %message, "guarded call timed out");

        self.replace_worker();
        let observer = Arc::clone(&self.observer);
        let reported = self.submit(move || {
            observer.limit_break(culprit, &message);
            observer.interrupted(&message);
        });
        if let Err(err) = reported {
            error!(%err, "cannot report timeout to observer");
        }
    }

    /// End the match as Stopped and tell the observer why.
    fn abort(&self, generation: u64, message: String) {
        {
            let mut control = self.control.lock();
            if !control.is_current(generation) {
                return;
            }
            control.state = MatchState::Stopped;
        }
        warn!(generation, %message, "match interrupted");
        self.observer.interrupted(&message);
    }

    /// End the match as Finished with `result`.
    fn finish(&self, generation: u64, result: GameResult) {
        {
            let mut control = self.control.lock();
            if !control.is_current(generation) {
                return;
            }
            control.state = MatchState::Finished;
            control.result = Some(result.clone());
        }
        info!(generation, %result, "match finished");
        self.observer.match_over(&result);
    }

    fn run_match(self: Arc<Self>, generation: u64, setup: MatchSetup, config: SessionConfig) {
        let Some(mut table) = self.initialize(generation, setup, &config) else {
            return;
        };
        {
            let mut control = self.control.lock();
            if control.generation != generation || control.state != MatchState::Initializing {
                return;
            }
            control.state = MatchState::Running;
        }
        info!(generation, players = table.players.player_count(), "match running");
        let _ = self.play(generation, &mut table, &config);
    }

    fn initialize(
        self: &Arc<Self>,
        generation: u64,
        setup: MatchSetup,
        config: &SessionConfig,
    ) -> Option<Table> {
        let MatchSetup { mut game, players } = setup;
        let budget = config.call_timeout();
        let seats = players.len();

        let (game_name, supported) = self.guarded(generation, budget, None, "game factory", || {
            let supported =
                seats <= MAX_SEATS && (game.min_players()..=game.max_players()).contains(&seats);
            (game.name().to_string(), supported)
        })?;
        if !supported {
            let err = Error::PlayerCount {
                game: game_name,
                players: seats,
            };
            self.abort(generation, err.to_string());
            return None;
        }

        let mut names = Vec::with_capacity(seats);
        let mut built = Vec::with_capacity(seats);
        for (seat, PlayerSetup { name, mut factory }) in players.into_iter().enumerate() {
            let culprit = Some(PlayerId::new(seat as u8));
            let made = self.guarded(generation, budget, culprit, "player construction", || {
                factory.new_player(&game_name, &name)
            })?;
            match made {
                Ok(player) => built.push(player),
                Err(err) => {
                    self.abort(generation, format!("cannot create player '{name}': {err}"));
                    return None;
                }
            }
            names.push(name);
        }
        let mut players = PlayerMap::from_vec(built);

        let limits = config.thread_limits();
        let mut interactive = Vec::with_capacity(seats);
        for (seat, player) in players.iter_mut() {
            let flag = self.guarded(generation, budget, Some(seat), "threads", || {
                player.threads(limits);
                player.is_interactive()
            })?;
            interactive.push(flag);
        }

        let ruler = self.new_ruler(generation, budget, game.as_mut(), &names)?;

        for (seat, player) in players.iter_mut() {
            let copy = self.guarded(generation, budget, None, "copy", || ruler.copy())?;
            self.guarded(generation, budget, Some(seat), "set_game", || player.set_game(copy))?;
        }
        let copy = self.guarded(generation, budget, None, "copy", || ruler.copy())?;
        let observer = Arc::clone(&self.observer);
        self.guarded(generation, budget, None, "observer set_game", || observer.set_game(copy))?;

        Some(Table {
            ruler,
            players,
            interactive: PlayerMap::from_vec(interactive),
        })
    }

    fn new_ruler(
        self: &Arc<Self>,
        generation: u64,
        budget: Option<Duration>,
        game: &mut dyn GameFactory,
        names: &[String],
    ) -> Option<Box<dyn GameRuler>> {
        let named = self.guarded(generation, budget, None, "set_player_names", || {
            game.set_player_names(names)
        })?;
        if let Err(err) = named {
            self.abort(generation, format!("cannot set player names: {err}"));
            return None;
        }

        match self.guarded(generation, budget, None, "new_game", || game.new_game())? {
            Ok(ruler) => Some(ruler),
            Err(err) => {
                self.abort(generation, format!("cannot create game: {err}"));
                None
            }
        }
    }

    /// The turn loop. Returns `None` as soon as the match stops being ours.
    fn play(self: &Arc<Self>, generation: u64, table: &mut Table, config: &SessionConfig) -> Option<()> {
        let budget = config.call_timeout();
        let seats = table.players.player_count();
        let ruler = &mut table.ruler;

        loop {
            if let Some(result) = self.guarded(generation, budget, None, "result", || ruler.result())? {
                self.finish(generation, result);
                return Some(());
            }

            let turn = self.guarded(generation, budget, None, "turn", || ruler.turn())?;
            let Some(seat) = turn.filter(|seat| seat.index() < seats) else {
                self.abort(generation, "game has no result and no player to move".to_string());
                return None;
            };

            let time_limit = self.guarded(generation, budget, None, "mechanics", || {
                ruler.mechanics().time_limit
            })?;
            let started = Instant::now();
            let player = table.players.get_mut(seat)?;
            let mv = self.guarded(
                generation,
                config.move_budget(time_limit),
                Some(seat),
                "get_move",
                || player.get_move(),
            )?;
            debug!(generation, %seat, %mv, elapsed_ms = started.elapsed().as_millis() as u64, "move received");

            let interactive = table.interactive.get(seat).copied().unwrap_or(false);
            if !interactive {
                let remaining = config.min_turn().saturating_sub(started.elapsed());
                if !remaining.is_zero() {
                    thread::sleep(remaining);
                }
            }

            let accepted = self.guarded(generation, budget, None, "apply_move", || ruler.apply_move(&mv))?;
            if !accepted {
                let recorded = self.guarded(generation, budget, None, "result", || ruler.result())?;
                let result = recorded.unwrap_or_else(|| GameResult::forfeit(seat, seats));
                warn!(generation, %seat, %mv, "invalid move, match forfeited");
                self.finish(generation, result);
                return Some(());
            }

            for (other, player) in table.players.iter_mut() {
                self.guarded(generation, budget, Some(other), "moved", || player.moved(seat, &mv))?;
            }
            let observer = Arc::clone(&self.observer);
            self.guarded(generation, budget, None, "observer moved", || observer.moved(seat, &mv))?;
        }
    }
}
