//! Retry observation hooks.

use crate::resilience::classify::FailureKind;
use crate::transport::TransportFailure;

/// Callbacks fired by the retry executor.
///
/// Hooks observe; they cannot change the retry decision.
pub trait RetryHook: Send + Sync {
    /// A transient failure is about to be retried. `attempt` is the number of
    /// the attempt that will run next (2 for the first retry).
    fn on_retry(&self, cause: &TransportFailure, attempt: u32);

    /// The execution succeeded after `attempts` attempts.
    fn on_success(&self, attempts: u32) {
        let _ = attempts;
    }

    /// The execution failed for good after `attempts` attempts.
    fn on_give_up(&self, cause: &TransportFailure, kind: FailureKind, attempts: u32) {
        let _ = (cause, kind, attempts);
    }
}

/// A hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl RetryHook for NoopHook {
    fn on_retry(&self, _cause: &TransportFailure, _attempt: u32) {}
}

/// Logs retry events with `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl RetryHook for TracingHook {
    fn on_retry(&self, cause: &TransportFailure, attempt: u32) {
        tracing::warn!(attempt = attempt, error = %cause, "Retrying after transient failure");
    }

    fn on_success(&self, attempts: u32) {
        if attempts > 1 {
            tracing::info!(attempts = attempts, "Request succeeded after retries");
        } else {
            tracing::debug!("Request succeeded on first attempt");
        }
    }

    fn on_give_up(&self, cause: &TransportFailure, kind: FailureKind, attempts: u32) {
        tracing::error!(
            attempts = attempts,
            kind = kind.as_str(),
            error = %cause,
            "Request failed"
        );
    }
}

impl<H: RetryHook + ?Sized> RetryHook for std::sync::Arc<H> {
    fn on_retry(&self, cause: &TransportFailure, attempt: u32) {
        (**self).on_retry(cause, attempt)
    }

    fn on_success(&self, attempts: u32) {
        (**self).on_success(attempts)
    }

    fn on_give_up(&self, cause: &TransportFailure, kind: FailureKind, attempts: u32) {
        (**self).on_give_up(cause, kind, attempts)
    }
}
