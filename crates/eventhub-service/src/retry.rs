//! Retry of whole units of work aborted by the storage layer.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use eventhub_core::config::AdmissionConfig;
use eventhub_core::result::AppResult;

/// How often a unit of work is re-run after a retryable conflict.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Create a retry policy. `max_attempts` counts the first try.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Build the policy from the admission settings.
    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self::new(config.max_attempts, config.retry_backoff())
    }

    /// Run `operation`, re-running it while it fails with a retryable error.
    ///
    /// The wait before attempt `n + 1` is `n × backoff`. Business errors are
    /// returned immediately.
    pub async fn run<T, F, Fut>(&self, name: &'static str, mut operation: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        operation = name,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Retrying after transaction conflict"
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&AdmissionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use eventhub_core::error::{AppError, ConflictReason, ErrorKind};

    #[tokio::test]
    async fn test_retries_transaction_conflicts_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = policy
            .run("test", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AppError::transaction_conflict("lock timeout"))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));

        let result: AppResult<()> = policy
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::transaction_conflict("deadlock"))
            })
            .await;

        assert_eq!(result.unwrap_err().kind, ErrorKind::TransactionConflict);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_business_conflicts_are_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));

        let result: AppResult<()> = policy
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::conflict(ConflictReason::CapacityExceeded, "full"))
            })
            .await;

        assert!(result.unwrap_err().is_conflict(ConflictReason::CapacityExceeded));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
