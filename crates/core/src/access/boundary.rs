//! Timeout and bounded retry around remote calls.
//!
//! Every call into the remote store runs under a per-attempt timeout. An
//! expired attempt counts as `Unavailable`; only `Unavailable` is retried,
//! with a linearly growing pause between attempts.

use std::future::Future;
use std::time::Duration;

use casal_shared::config::RemoteConfig;
use tracing::warn;

use crate::remote::RemoteError;

/// Timeout and retry settings for remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Total attempts, at least one.
    pub max_attempts: u32,
    /// Pause before the second attempt; multiplied by the attempt number after that.
    pub backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self::from(&RemoteConfig::default())
    }
}

impl From<&RemoteConfig> for CallPolicy {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl CallPolicy {
    /// Same timeout, no retry. Used for calls that are not idempotent.
    #[must_use]
    pub const fn single_attempt(self) -> Self {
        Self {
            max_attempts: 1,
            ..self
        }
    }
}

/// Runs `op` under `policy`.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-retryable error immediately.
pub async fn call<T, F, Fut>(
    policy: &CallPolicy,
    operation: &'static str,
    mut op: F,
) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let outcome = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::unavailable(format!(
                "{operation} timed out after {}ms",
                policy.timeout.as_millis()
            ))),
        };

        match outcome {
            Err(err) if err.is_retryable() && attempt < attempts => {
                warn!(operation, attempt, error = %err, "remote call failed, retrying");
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
