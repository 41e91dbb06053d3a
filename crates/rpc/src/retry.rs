//! Retry decorator for unary gRPC calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tonic::{Code, Status};

/// How long to wait before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay after every failed attempt.
    Constant(Duration),
    /// `base * attempt`: 1x after the first failure, 2x after the second, ...
    Linear(Duration),
    /// Doubles after every failed attempt, capped at `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Returns the delay after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match *self {
            Backoff::Constant(delay) => delay,
            Backoff::Linear(base) => base.saturating_mul(attempt),
            Backoff::Exponential { initial, max } => {
                let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Retries a call while it fails with a retryable status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Status codes worth another attempt.
    pub retryable_codes: Vec<Code>,
    /// Upper bound on attempts, the first one included.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retryable_codes: vec![Code::Unavailable, Code::ResourceExhausted],
            max_attempts: 5,
            backoff: Backoff::Constant(Duration::from_secs(1)),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn is_retryable(&self, status: &Status) -> bool {
        self.retryable_codes.contains(&status.code())
    }

    /// Runs `call` until it succeeds, fails with a non-retryable code, or
    /// runs out of attempts. `call` receives the 1-based attempt number.
    ///
    /// The last status is returned unchanged.
    pub async fn run<F, Fut, T>(&self, service: &'static str, mut call: F) -> Result<T, Status>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match call(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(service, attempt, "call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(status) if !self.is_retryable(&status) => return Err(status),
                Err(status) if attempt >= max_attempts => {
                    tracing::warn!(
                        service,
                        attempt,
                        code = ?status.code(),
                        "giving up after final attempt"
                    );
                    return Err(status);
                }
                Err(status) => {
                    let delay = self.backoff.delay(attempt);
                    tracing::warn!(
                        service,
                        attempt,
                        max_attempts,
                        code = ?status.code(),
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    metrics::counter!("rpc_call_retries_total", "service" => service)
                        .increment(1);
                    sleep(delay).await;
                }
            }
        }
    }
}
