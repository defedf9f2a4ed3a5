//! Bounded retry with exponential backoff and jitter
//!
//! [`RetryPolicy`] knows nothing about HTTP. Callers supply a decision
//! function that turns an error into a [`RetryDecision`] and, optionally, an
//! observer that is told about every retry and give-up.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default jitter ratio applied on top of the backoff delay
pub const DEFAULT_JITTER_RATIO: f64 = 0.2;

/// Outcome of inspecting a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryDecision {
    /// Whether another attempt should be made
    pub retry: bool,

    /// Explicit delay to use instead of exponential backoff (still capped)
    pub delay: Option<Duration>,
}

impl RetryDecision {
    /// Retry with the computed backoff
    pub fn retry() -> Self {
        Self {
            retry: true,
            delay: None,
        }
    }

    /// Retry after a specific delay
    pub fn retry_after(delay: Duration) -> Self {
        Self {
            retry: true,
            delay: Some(delay),
        }
    }

    /// Give up and propagate the error
    pub fn stop() -> Self {
        Self {
            retry: false,
            delay: None,
        }
    }
}

impl From<bool> for RetryDecision {
    fn from(retry: bool) -> Self {
        Self { retry, delay: None }
    }
}

/// Notification sent to a retry observer
///
/// `attempt` is 1-based: the attempt that just failed.
#[derive(Debug)]
pub enum RetryEvent<'a, E> {
    /// Another attempt will be made after `delay`
    Retry {
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
        error: &'a E,
    },

    /// The error is being propagated
    GiveUp {
        attempt: u32,
        max_attempts: u32,
        error: &'a E,
    },
}

type RandomFn = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Retry policy with capped exponential backoff
///
/// `retries` counts the attempts made after the first one, so `retries = 5`
/// allows up to six calls in total.
#[derive(Clone)]
pub struct RetryPolicy {
    retries: u32,
    min_delay: Duration,
    max_delay: Duration,
    jitter_ratio: f64,
    random: RandomFn,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retries", &self.retries)
            .field("min_delay", &self.min_delay)
            .field("max_delay", &self.max_delay)
            .field("jitter_ratio", &self.jitter_ratio)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Creates a policy with the default jitter ratio and a uniform random source
    pub fn new(retries: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            retries,
            min_delay,
            max_delay,
            jitter_ratio: DEFAULT_JITTER_RATIO,
            random: Arc::new(rand::random::<f64>),
        }
    }

    /// Sets the jitter ratio, clamped to `0.0..=1.0`
    pub fn with_jitter_ratio(mut self, jitter_ratio: f64) -> Self {
        self.jitter_ratio = clamp_unit(jitter_ratio);
        self
    }

    /// Replaces the random source used for jitter
    ///
    /// Values outside `0.0..=1.0` are clamped.
    pub fn with_random<R>(mut self, random: R) -> Self
    where
        R: Fn() -> f64 + Send + Sync + 'static,
    {
        self.random = Arc::new(random);
        self
    }

    /// Number of retries after the first attempt
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Total attempts allowed, including the first
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay before the next attempt, jitter included
    ///
    /// `attempt` is the 0-based index of the attempt that just failed.
    pub fn delay_for(&self, attempt: u32, decision: &RetryDecision) -> Duration {
        let backoff = match decision.delay {
            Some(delay) => delay.min(self.max_delay),
            None => self
                .min_delay
                .saturating_mul(2u32.saturating_pow(attempt))
                .min(self.max_delay),
        };

        let random = clamp_unit((self.random)());
        let jitter_ms = (backoff.as_millis() as f64 * self.jitter_ratio * random).floor();

        backoff + Duration::from_millis(jitter_ms as u64)
    }

    /// Runs `operation` until it succeeds or the policy gives up
    pub async fn run<T, E, Op, Fut, D>(&self, operation: Op, should_retry: D) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        D: Fn(&E) -> RetryDecision,
    {
        self.run_observed(operation, should_retry, |_| {}).await
    }

    /// Runs `operation`, reporting every retry and give-up to `observer`
    ///
    /// On a retryable failure the policy sleeps first and then notifies the
    /// observer. On give-up the observer is notified and the original error
    /// is returned unchanged.
    pub async fn run_observed<T, E, Op, Fut, D, O>(
        &self,
        mut operation: Op,
        should_retry: D,
        mut observer: O,
    ) -> Result<T, E>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        D: Fn(&E) -> RetryDecision,
        O: FnMut(RetryEvent<'_, E>),
    {
        let max_attempts = self.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let decision = should_retry(&error);
            if attempt >= self.retries || !decision.retry {
                observer(RetryEvent::GiveUp {
                    attempt: attempt + 1,
                    max_attempts,
                    error: &error,
                });
                return Err(error);
            }

            let delay = self.delay_for(attempt, &decision);
            tokio::time::sleep(delay).await;

            observer(RetryEvent::Retry {
                attempt: attempt + 1,
                max_attempts,
                delay,
                error: &error,
            });

            attempt += 1;
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
