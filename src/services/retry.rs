//! Bounded retry for best-effort browser operations.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The check passed on this attempt (1-based).
    Succeeded(u32),
    Exhausted,
}

impl RetryOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, RetryOutcome::Succeeded(_))
    }
}

/// Runs `check` up to `attempts` times, sleeping `interval` between tries.
pub async fn retry_until<F, Fut>(attempts: u32, interval: Duration, mut check: F) -> RetryOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    for attempt in 1..=attempts {
        if check(attempt).await {
            return RetryOutcome::Succeeded(attempt);
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    RetryOutcome::Exhausted
}
