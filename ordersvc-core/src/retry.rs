//! Bounded exponential-backoff retry for transient failures.
//!
//! Under a load spike the connection pool briefly saturates; a short
//! bounded backoff turns that hard failure into eventual success. The
//! caller supplies the predicate deciding which errors are worth another
//! attempt, so this module stays independent of what it retries.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Tuning for [`execute`].
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Total number of attempts, including the first.
    pub max_retries: u32,
    /// Starting point for the backoff sleep.
    pub base_delay: Duration,
    /// Upper bound on any single backoff sleep.
    pub max_delay: Duration,
    /// Multiplier applied per retry index.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(500),
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Sleep inserted before retry `attempt` (1-based retry index).
    ///
    /// Grows as `base * factor * attempt`, capped at `max_delay`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .mul_f64(self.backoff_factor * f64::from(attempt))
            .min(self.max_delay)
    }
}

/// Why [`execute`] gave up.
#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// The cancellation token fired during a backoff sleep.
    #[error("retry cancelled")]
    Cancelled,

    /// The last failure was not retryable; remaining attempts were not consumed.
    #[error("retry condition not met: {source}")]
    ConditionNotMet {
        #[source]
        source: E,
    },

    /// Every attempt failed with a retryable error.
    #[error("max retries ({attempts}) exceeded: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },
}

/// Run `operation` up to `config.max_retries` times.
///
/// A backoff sleep precedes every attempt after the first. If `cancel`
/// fires during that sleep the call returns [`RetryError::Cancelled`]
/// immediately. A failure rejected by `is_retryable` propagates at once
/// without consuming the remaining attempts.
pub async fn execute<T, E, F, Fut, P>(
    config: RetryConfig,
    cancel: &CancellationToken,
    is_retryable: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let attempts = config.max_retries.max(1);
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = config.backoff(attempt);
            tracing::warn!(
                attempt,
                max_retries = attempts,
                delay_ms = delay.as_millis() as u64,
                "transient failure, backing off before retry"
            );
            tokio::select! {
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retryable(&err) {
                    return Err(RetryError::ConditionNotMet { source: err });
                }
                attempt += 1;
                if attempt >= attempts {
                    return Err(RetryError::Exhausted {
                        attempts,
                        source: err,
                    });
                }
            }
        }
    }
}
