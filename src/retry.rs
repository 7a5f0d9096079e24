//! Quota retry with exponential backoff.
//!
//! Only quota errors are retried. With the default policy the waits are
//! 1, 2, 4, 8, 16 and 32 seconds, after which the seventh quota error is
//! returned to the caller. Every wait is raced against the caller's
//! cancellation token.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{ErrorKind, Result, WorkizError};

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 6;

/// Default backoff unit.
const BASE_DELAY: Duration = Duration::from_secs(1);

/// Backoff schedule for quota errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// The wait before retry number `attempt + 1`: `base * 2^attempt`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Run `op` until it returns something other than a quota error, or the
/// policy's retries are spent.
pub async fn send_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(WorkizError::Cancelled);
        }

        match op().await {
            Err(e) if e.kind() == ErrorKind::QuotaExceeded && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                tracing::debug!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "quota exceeded, backing off"
                );

                tokio::select! {
                    _ = cancel.cancelled() => return Err(WorkizError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            Err(e) => {
                if attempt > 0 {
                    tracing::debug!(attempts = attempt + 1, kind = %e.kind(), "giving up");
                }
                return Err(e);
            }
            ok => return ok,
        }
    }
}
