//! Retry policy.

use std::fmt;
use std::sync::Arc;

use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;
use crate::resilience::classify::FailureKind;

/// Default total number of attempts (one initial attempt + two retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

type RetriablePredicate = Arc<dyn Fn(FailureKind) -> bool + Send + Sync>;

/// How many attempts to make and which failure kinds to retry.
///
/// Read-only once built; cloning shares the predicate.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    is_retriable: RetriablePredicate,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts that retries transient failures.
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            is_retriable: Arc::new(|kind| kind == FailureKind::Transient),
            backoff: Backoff::none(),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts).with_backoff(Backoff::from_config(config))
    }

    /// Replace the retriable predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(FailureKind) -> bool + Send + Sync + 'static,
    {
        self.is_retriable = Arc::new(predicate);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn is_retriable(&self, kind: FailureKind) -> bool {
        (self.is_retriable)(kind)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}
