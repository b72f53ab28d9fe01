//! Repeating calls
//!
//! Runs a callback on a background thread at a fixed interval, a bounded
//! number of times.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};

/// Handle to a running repeater
///
/// Dropping the handle stops the repeater without waiting for it.
pub struct Repeater {
    /// Closing (or sending on) this channel stops the worker
    stop_tx: Option<Sender<()>>,

    /// Calls completed so far
    runs: Arc<AtomicUsize>,

    worker: Option<JoinHandle<()>>,
}

impl Repeater {
    /// Call `callback` every `interval`, at most `max_runs` times
    ///
    /// The first call happens one interval after start.
    pub fn start<F>(interval: Duration, max_runs: usize, mut callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let runs = Arc::new(AtomicUsize::new(0));
        let worker_runs = Arc::clone(&runs);

        tracing::info!("Repeater started: every {:?}, max {} runs", interval, max_runs);

        let worker = thread::spawn(move || {
            while worker_runs.load(Ordering::SeqCst) < max_runs {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        callback();
                        worker_runs.fetch_add(1, Ordering::SeqCst);
                    }
                    // Stop requested or handle dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!("Repeater finished after {} runs", worker_runs.load(Ordering::SeqCst));
        });

        Self {
            stop_tx: Some(stop_tx),
            runs,
            worker: Some(worker),
        }
    }

    /// Ask the repeater to stop before its next call
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
    }

    /// Calls completed so far
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map(JoinHandle::is_finished).unwrap_or(true)
    }

    /// Wait for the repeater to finish and return the number of calls
    ///
    /// A callback panic is reported through `tracing` and ends the repeater.
    pub fn join(mut self) -> usize {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Repeater callback panicked");
            }
        }
        self.runs()
    }
}

impl Drop for Repeater {
    fn drop(&mut self) {
        self.stop();
    }
}
