//! Background fetch service
//!
//! Runs repository queries off the UI thread. Results are collected by
//! polling on every tick, the same way the event loop polls other jobs.

use super::RepositoryError;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

/// One in-flight repository query
struct PendingFetch<T> {
    receiver: Receiver<Result<T, RepositoryError>>,
    started: Instant,
}

/// Runs at most one query at a time; a new request replaces the pending one
pub struct Fetcher<T> {
    pending: Option<PendingFetch<T>>,
}

impl<T> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fetcher<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T: Send + 'static> Fetcher<T> {
    /// Start `query` on a worker thread
    pub fn spawn<F>(&mut self, query: F)
    where
        F: FnOnce() -> Result<T, RepositoryError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            // the receiver is gone when the request was superseded
            let _ = tx.send(query());
        });

        self.pending = Some(PendingFetch {
            receiver: rx,
            started: Instant::now(),
        });
    }

    /// The finished result, if the query completed since the last poll
    pub fn poll(&mut self) -> Option<Result<T, RepositoryError>> {
        let pending = self.pending.as_ref()?;

        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                log::error!("fetch worker exited without a result");
                self.pending = None;
                return None;
            }
        };

        log::debug!("fetch finished in {:?}", pending.started.elapsed());
        self.pending = None;
        Some(result)
    }
}
