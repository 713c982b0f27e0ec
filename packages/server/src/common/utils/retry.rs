use std::future::Future;
use std::time::Duration;

/// Bounded exponential backoff for short read-after-write races.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Used when a freshly created profile row is not visible yet.
    pub const ROLE_LOOKUP: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(100),
        multiplier: 2,
    };

    pub fn delay_before(&self, attempt: u32) -> Duration {
        // attempt is 1-based; no delay before the first try
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.initial_delay * self.multiplier.saturating_pow(attempt - 2)
    }
}

/// Run `op` until it yields `Some`, an error, or the policy is exhausted.
///
/// Errors are returned immediately; only `Ok(None)` ("not there yet") is
/// retried.
pub async fn retry_until_some<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<Option<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    for attempt in 1..=policy.max_attempts.max(1) {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(value) = op(attempt).await? {
            return Ok(Some(value));
        }
        tracing::debug!(attempt, "value not available yet, retrying");
    }
    Ok(None)
}
