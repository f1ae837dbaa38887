//! Injected failures and latency.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use casal_core::remote::RemoteError;

#[derive(Debug, Default)]
pub(super) struct Faults {
    failures: AtomicU32,
    latency_ms: AtomicU64,
}

impl Faults {
    pub fn fail_next(&self, calls: u32) {
        self.failures.store(calls, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    /// Waits out the configured latency, then consumes one injected failure.
    pub async fn enter(&self, operation: &'static str) -> Result<(), RemoteError> {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            tracing::debug!(operation, "injected failure");
            return Err(RemoteError::unavailable(format!("{operation}: injected failure")));
        }
        Ok(())
    }
}
