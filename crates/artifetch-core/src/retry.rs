//! Bounded retry with a fixed backoff delay.
//!
//! The wrapper is generic over the attempted operation. Only errors for
//! which [`FetchError::is_retryable`] holds are attempted again; anything
//! else surfaces immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{FetchError, FetchResult};

/// How many whole attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero behaves like one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy.
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt, no retries.
    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Same attempt count with no delay, for tests.
    #[must_use]
    pub const fn without_delay(self) -> Self {
        Self::new(self.max_attempts, Duration::ZERO)
    }
}

/// Run `operation` until it succeeds, fails terminally, or the policy is
/// exhausted.
///
/// The closure receives the 1-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> FetchResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = FetchResult<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < attempts => {
                warn!("{label}: attempt {attempt} failed, retrying... ({err})");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(FetchError::Transport { message, status }) if attempts > 1 => {
                return Err(FetchError::Transport {
                    message: format!("{label} failed after {attempts} attempts: {message}"),
                    status,
                });
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const FAST: RetryPolicy = RetryPolicy::new(3, Duration::ZERO);

    #[tokio::test]
    async fn test_first_success_makes_one_attempt() {
        let calls = Cell::new(0);
        let result = retry_with_backoff(FAST, "fetch", |_| {
            calls.set(calls.get() + 1);
            async { Ok::<_, FetchError>(42) }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_transport_failures_are_retried_until_success() {
        let result = retry_with_backoff(FAST, "fetch", |attempt| async move {
            if attempt < 3 {
                Err(FetchError::transport("connection reset"))
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_exhausted_attempts_report_count() {
        let calls = Cell::new(0);
        let result: FetchResult<()> = retry_with_backoff(FAST, "Model info", |_| {
            calls.set(calls.get() + 1);
            async { Err(FetchError::transport_with_status("bad gateway", 502)) }
        })
        .await;

        assert_eq!(calls.get(), 3);
        match result {
            Err(FetchError::Transport { message, status }) => {
                assert!(message.contains("after 3 attempts"));
                assert!(message.contains("bad gateway"));
                assert_eq!(status, Some(502));
            }
            other => panic!("Expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_terminal_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: FetchResult<()> = retry_with_backoff(FAST, "fetch", |_| {
            calls.set(calls.get() + 1);
            async { Err(FetchError::not_found("model 1 not found")) }
        })
        .await;
        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_zero_attempts_behaves_like_one() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(0, Duration::ZERO);
        let _: FetchResult<()> = retry_with_backoff(policy, "fetch", |_| {
            calls.set(calls.get() + 1);
            async { Err(FetchError::transport("down")) }
        })
        .await;
        assert_eq!(calls.get(), 1);
    }
}
