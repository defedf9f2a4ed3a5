//! Bounded-concurrency task runner
//!
//! Runs a batch of independent async tasks with at most `concurrency` of them
//! in flight. Every task settles; a failure never cancels its siblings.

use crate::domain::{Result, SyncError};
use futures::future::join_all;
use std::future::Future;
use tokio::sync::Semaphore;

/// Upper bound accepted for a limiter
pub const MAX_PERMITS: usize = Semaphore::MAX_PERMITS;

/// Semaphore-backed worker pool
///
/// Admission is FIFO: the semaphore is fair and the tasks queue for permits in
/// submission order, so task `i` never starts before task `i - 1`. Completion
/// order is unconstrained, but [`ConcurrencyLimiter::run`] returns outcomes in
/// submission order. The semaphore is created per call, so concurrent runs
/// never share capacity.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyLimiter {
    concurrency: usize,
}

impl ConcurrencyLimiter {
    /// Creates a limiter, rejecting a concurrency below 1
    pub fn new(concurrency: usize) -> Result<Self> {
        if concurrency < 1 {
            return Err(SyncError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if concurrency > MAX_PERMITS {
            return Err(SyncError::Validation(format!(
                "concurrency must be at most {MAX_PERMITS}"
            )));
        }
        Ok(Self { concurrency })
    }

    /// Configured concurrency
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every task and collects all outcomes in submission order
    ///
    /// Tasks are not retried. Each closure is invoked only once a permit is
    /// held, so no task does any work before it is admitted.
    pub async fn run<F, Fut, T, E>(&self, tasks: Vec<F>) -> Vec<std::result::Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let semaphore = Semaphore::new(self.concurrency);
        let semaphore = &semaphore;

        let admitted = tasks.into_iter().map(|task| async move {
            // The semaphore is local and never closed
            let _permit = semaphore.acquire().await.ok();
            task().await
        });

        join_all(admitted).await
    }
}
