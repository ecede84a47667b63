//! Wall-clock supervisor for guarded calls.
//!
//! A `Watchdog` owns one long-lived thread that parks on a condition
//! variable until a countdown is armed. At most one countdown is armed at a
//! time; arming replaces the previous one.
//!
//! ## The disarm race
//!
//! A guarded call may return at the very instant its countdown expires.
//! Both paths take the watchdog lock:
//!
//! - the firing path removes the countdown and records its token as fired
//!   *before* releasing the lock to run the expiry callback;
//! - `disarm` removes the countdown if it is still armed, and otherwise
//!   reports whether that token fired.
//!
//! So exactly one side wins: either the callback runs and `disarm` returns
//! `false`, or `disarm` returns `true` and the callback never runs.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::error::{Error, Result};

type Expiry = Box<dyn FnOnce() + Send>;

/// Identifies one armed countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchToken(u64);

/// Countdown supervisor running on its own thread.
pub struct Watchdog {
    shared: Arc<Shared>,
}

struct Shared {
    countdown: Mutex<Countdown>,
    wake: Condvar,
}

#[derive(Default)]
struct Countdown {
    next_token: u64,
    armed: Option<Armed>,
    last_fired: Option<WatchToken>,
    shutdown: bool,
}

struct Armed {
    token: WatchToken,
    deadline: Instant,
    on_expiry: Expiry,
}

impl Watchdog {
    /// Start the supervisor thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let shared = Arc::new(Shared {
            countdown: Mutex::new(Countdown::default()),
            wake: Condvar::new(),
        });

        let worker = Arc::clone(&shared);
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker.run())
            .map_err(|source| Error::Spawn { name, source })?;

        Ok(Self { shared })
    }

    /// Start counting down `budget`; `on_expiry` runs on the watchdog thread
    /// if the countdown is not disarmed in time.
    pub fn arm(&self, budget: Duration, on_expiry: impl FnOnce() + Send + 'static) -> WatchToken {
        let mut countdown = self.shared.countdown.lock();
        let token = WatchToken(countdown.next_token);
        countdown.next_token += 1;
        countdown.armed = Some(Armed {
            token,
            deadline: Instant::now() + budget,
            on_expiry: Box::new(on_expiry),
        });
        trace!(token = token.0, ?budget, "watchdog armed");
        self.shared.wake.notify_one();
        token
    }

    /// Stop the countdown. Returns `false` iff it already fired.
    pub fn disarm(&self, token: WatchToken) -> bool {
        let mut countdown = self.shared.countdown.lock();
        if countdown.armed.as_ref().is_some_and(|armed| armed.token == token) {
            countdown.armed = None;
            self.shared.wake.notify_one();
            return true;
        }
        countdown.last_fired != Some(token)
    }

    /// Drop whatever countdown is armed without firing it.
    pub fn cancel(&self) {
        let mut countdown = self.shared.countdown.lock();
        if let Some(armed) = countdown.armed.take() {
            debug!(token = armed.token.0, "watchdog countdown cancelled");
            self.shared.wake.notify_one();
        }
    }

    /// Ask the supervisor thread to exit. An armed countdown never fires.
    pub fn shutdown(&self) {
        let mut countdown = self.shared.countdown.lock();
        countdown.shutdown = true;
        countdown.armed = None;
        self.shared.wake.notify_one();
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    fn run(&self) {
        let mut countdown = self.countdown.lock();
        loop {
            if countdown.shutdown {
                debug!("watchdog exiting");
                return;
            }
            let Some(deadline) = countdown.armed.as_ref().map(|armed| armed.deadline) else {
                self.wake.wait(&mut countdown);
                continue;
            };
            if Instant::now() < deadline {
                // Woken early by arm/disarm or spuriously; re-evaluate.
                self.wake.wait_until(&mut countdown, deadline);
                continue;
            }
            if let Some(armed) = countdown.armed.take() {
                countdown.last_fired = Some(armed.token);
                debug!(token = armed.token.0, "watchdog countdown expired");
                MutexGuard::unlocked(&mut countdown, armed.on_expiry);
            }
        }
    }
}
