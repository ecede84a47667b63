//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use rust_boardplay::core::{Move, PlayerId};
use rust_boardplay::error::Result;
use rust_boardplay::players::Player;
use rust_boardplay::rules::{GameResult, GameRuler, PlayerFactory};
use rust_boardplay::session::Observer;

/// Install a test subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One observer callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SetGame,
    Moved(PlayerId, Move),
    LimitBreak(Option<PlayerId>),
    Interrupted,
    MatchOver(GameResult),
}

impl Event {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Interrupted | Event::MatchOver(_))
    }
}

/// Observer recording every callback with the thread it ran on.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(Event, Option<String>)>>,
    changed: Condvar,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: Event) {
        let thread = thread::current().name().map(str::to_string);
        self.events.lock().push((event, thread));
        self.changed.notify_all();
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn threads(&self) -> Vec<Option<String>> {
        self.events.lock().iter().map(|(_, t)| t.clone()).collect()
    }

    /// Block until `done` holds for the recorded events, or `timeout` passes.
    pub fn wait_for(&self, timeout: Duration, done: impl Fn(&[Event]) -> bool) -> Vec<Event> {
        let deadline = Instant::now() + timeout;
        let mut events = self.events.lock();
        loop {
            let snapshot: Vec<Event> = events.iter().map(|(e, _)| e.clone()).collect();
            if done(&snapshot) || Instant::now() >= deadline {
                return snapshot;
            }
            self.changed.wait_until(&mut events, deadline);
        }
    }

    /// Wait for `match_over` or `interrupted`.
    pub fn wait_terminal(&self, timeout: Duration) -> Vec<Event> {
        self.wait_for(timeout, |events| events.iter().any(Event::is_terminal))
    }
}

impl Observer for RecordingObserver {
    fn set_game(&self, _game: Box<dyn GameRuler>) {
        self.push(Event::SetGame);
    }

    fn moved(&self, player: PlayerId, mv: &Move) {
        self.push(Event::Moved(player, mv.clone()));
    }

    fn limit_break(&self, player: Option<PlayerId>, _message: &str) {
        self.push(Event::LimitBreak(player));
    }

    fn interrupted(&self, _message: &str) {
        self.push(Event::Interrupted);
    }

    fn match_over(&self, result: &GameResult) {
        self.push(Event::MatchOver(result.clone()));
    }
}

/// Player that sleeps for `delay`, then plays its first valid move.
pub struct SlowPlayer {
    name: String,
    delay: Duration,
    game: Option<Box<dyn GameRuler>>,
}

impl Player for SlowPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_game(&mut self, game: Box<dyn GameRuler>) {
        self.game = Some(game);
    }

    fn get_move(&mut self) -> Move {
        thread::sleep(self.delay);
        self.game
            .as_ref()
            .and_then(|g| g.valid_moves().into_iter().next())
            .unwrap_or(Move::Resign)
    }

    fn moved(&mut self, _player: PlayerId, mv: &Move) {
        if let Some(game) = &mut self.game {
            game.apply_move(mv);
        }
    }
}

pub struct SlowPlayerFactory(pub Duration);

impl PlayerFactory for SlowPlayerFactory {
    fn name(&self) -> &str {
        "slow"
    }

    fn new_player(&mut self, _game: &str, name: &str) -> Result<Box<dyn Player>> {
        Ok(Box::new(SlowPlayer {
            name: name.to_string(),
            delay: self.0,
            game: None,
        }))
    }
}

/// Player blocked in `get_move` until its gate is opened or dropped.
pub struct GatedPlayer {
    gate: Receiver<()>,
    entered: Sender<()>,
}

impl Player for GatedPlayer {
    fn name(&self) -> &str {
        "gated"
    }

    fn set_game(&mut self, _game: Box<dyn GameRuler>) {}

    fn get_move(&mut self) -> Move {
        let _ = self.entered.send(());
        let _ = self.gate.recv();
        Move::Resign
    }

    fn moved(&mut self, _player: PlayerId, _mv: &Move) {}
}

/// Factory for one gated player. Returns the gate sender and a receiver
/// signalled when `get_move` is entered.
pub struct GatedPlayerFactory {
    parts: Option<(Receiver<()>, Sender<()>)>,
}

impl GatedPlayerFactory {
    pub fn new() -> (Self, Sender<()>, Receiver<()>) {
        let (gate_tx, gate_rx) = mpsc::channel();
        let (entered_tx, entered_rx) = mpsc::channel();
        let factory = Self {
            parts: Some((gate_rx, entered_tx)),
        };
        (factory, gate_tx, entered_rx)
    }
}

impl PlayerFactory for GatedPlayerFactory {
    fn name(&self) -> &str {
        "gated"
    }

    fn new_player(&mut self, _game: &str, _name: &str) -> Result<Box<dyn Player>> {
        let (gate, entered) = self
            .parts
            .take()
            .ok_or_else(|| rust_boardplay::Error::Factory("gated player already built".into()))?;
        Ok(Box::new(GatedPlayer { gate, entered }))
    }
}

/// Player that always answers with the same move.
pub struct FixedPlayer(pub Move);

impl Player for FixedPlayer {
    fn name(&self) -> &str {
        "fixed"
    }

    fn set_game(&mut self, _game: Box<dyn GameRuler>) {}

    fn get_move(&mut self) -> Move {
        self.0.clone()
    }

    fn moved(&mut self, _player: PlayerId, _mv: &Move) {}
}

pub struct FixedPlayerFactory(pub Move);

impl PlayerFactory for FixedPlayerFactory {
    fn name(&self) -> &str {
        "fixed"
    }

    fn new_player(&mut self, _game: &str, _name: &str) -> Result<Box<dyn Player>> {
        Ok(Box::new(FixedPlayer(self.0.clone())))
    }
}

/// Factory that always fails.
pub struct BrokenPlayerFactory;

impl PlayerFactory for BrokenPlayerFactory {
    fn name(&self) -> &str {
        "broken"
    }

    fn new_player(&mut self, _game: &str, _name: &str) -> Result<Box<dyn Player>> {
        Err(rust_boardplay::Error::Factory("no such engine".into()))
    }
}
