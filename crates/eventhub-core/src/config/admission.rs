//! Admission transaction configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds for the per-event critical section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// How long a unit of work waits for the event lock before giving up.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_ms: u64,
    /// Total attempts for an operation that hits a transaction conflict.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff step between attempts; attempt `n` sleeps `n * backoff`.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl AdmissionConfig {
    /// The lock timeout as a [`Duration`].
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// The retry backoff step as a [`Duration`].
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_lock_timeout() -> u64 {
    5000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    50
}
