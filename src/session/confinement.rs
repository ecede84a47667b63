//! Single-thread executor confining untrusted calls.
//!
//! Players and rules engines are not required to be thread-safe. A session
//! therefore runs every call into them as a job on one `ConfinementWorker`
//! thread, in submission order.
//!
//! A worker stuck inside a call cannot be interrupted. The session instead
//! `abandon`s it: the job channel is closed and the thread is detached, so it
//! exits on its own once (if ever) the stuck call returns.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle, ThreadId};

use tracing::{debug, error};

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send>;

/// A named thread executing submitted jobs one at a time.
pub struct ConfinementWorker {
    name: String,
    jobs: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl ConfinementWorker {
    /// Start a worker thread called `name`.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (jobs, queue) = mpsc::channel::<Job>();

        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                for job in queue {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!(worker = %thread_name, "confined job panicked");
                    }
                }
                debug!(worker = %thread_name, "confinement worker exiting");
            })
            .map_err(|source| Error::Spawn {
                name: name.clone(),
                source,
            })?;

        debug!(worker = %name, "confinement worker started");
        Ok(Self {
            name,
            jobs: Some(jobs),
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Thread id of the worker.
    #[must_use]
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.handle.as_ref().map(|h| h.thread().id())
    }

    /// Queue a job behind the ones already submitted.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<()> {
        self.jobs
            .as_ref()
            .ok_or(Error::WorkerGone)?
            .send(Box::new(job))
            .map_err(|_| Error::WorkerGone)
    }

    /// Stop accepting jobs and detach the thread without waiting for it.
    pub fn abandon(mut self) {
        debug!(worker = %self.name, "confinement worker abandoned");
        self.jobs = None;
        self.handle = None;
    }

    /// Stop accepting jobs and wait until the queued ones have run.
    pub fn join(mut self) {
        self.jobs = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!(worker = %self.name, "confinement worker died");
            }
        }
    }
}

impl Drop for ConfinementWorker {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain its queue and exit.
        self.jobs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_jobs_run_in_order_on_worker_thread() {
        let worker = ConfinementWorker::spawn("test-worker").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = Arc::clone(&seen);
            worker
                .submit(move || {
                    let name = thread::current().name().map(str::to_string);
                    seen.lock().unwrap().push((i, name));
                })
                .unwrap();
        }
        worker.join();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        for (i, (order, name)) in seen.iter().enumerate() {
            assert_eq!(*order, i);
            assert_eq!(name.as_deref(), Some("test-worker"));
        }
    }

    #[test]
    fn test_survives_panicking_job() {
        let worker = ConfinementWorker::spawn("test-worker").unwrap();
        let (tx, rx) = mpsc::channel();

        worker.submit(|| panic!("boom")).unwrap();
        worker.submit(move || tx.send(7).unwrap()).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }

    #[test]
    fn test_abandon_does_not_wait() {
        let worker = ConfinementWorker::spawn("test-worker").unwrap();
        let (release, blocked) = mpsc::channel::<()>();

        worker
            .submit(move || {
                let _ = blocked.recv();
            })
            .unwrap();

        let started = std::time::Instant::now();
        worker.abandon();
        assert!(started.elapsed() < Duration::from_secs(1));
        drop(release);
    }
}
