//! Cancellation for in-flight executions.
//!
//! A cancel is sticky: once requested it stays requested, so an execution
//! started after `cancel()` stops before its first attempt.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Shared signal that stops every execution observing it.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Executions drop their in-flight attempt and
    /// return [`Cancelled`](crate::resilience::ExecutionError::Cancelled).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation is requested, immediately if it already was.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_waiting_task() {
        let handle = CancelHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });

        tokio::task::yield_now().await;
        handle.cancel();

        tokio::time::timeout(Duration::from_millis(200), task)
            .await
            .expect("cancel should wake the waiting task")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_is_remembered() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());

        handle.cancel();
        let late = handle.clone();
        assert!(late.is_cancelled());
        tokio::time::timeout(Duration::from_millis(50), late.cancelled())
            .await
            .expect("an earlier cancel should resolve immediately");
    }
}
