//! Retry executor.
//!
//! # Responsibilities
//! - Call the transport, one attempt at a time
//! - Classify each failure and decide whether to try again
//! - Surface the response body or the last attempt's failure
//!
//! # Algorithm
//! ```text
//! attempt = 1
//! loop:
//!     call transport
//!     Ok(body)                         → return body
//!     Err(unexpected)                  → return it (never retried)
//!     Err(f), kind = classify(f)
//!         !retriable(kind) or attempt == max_attempts → return f
//!         else attempt += 1, on_retry(f, attempt), backoff, loop
//! ```
//!
//! # Design Decisions
//! - Attempts are strictly sequential; each gets a fresh transport timeout
//! - The executor holds no mutable state, one instance serves concurrent calls
//! - Cancellation is terminal: the in-flight attempt is dropped, no retry follows

use std::future::Future;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ExecutorConfig;
use crate::observability::metrics;
use crate::resilience::cancel::CancelHandle;
use crate::resilience::classify::{classify, FailureKind};
use crate::resilience::error::ExecutionError;
use crate::resilience::hooks::{RetryHook, TracingHook};
use crate::resilience::policy::RetryPolicy;
use crate::transport::{HttpTransport, Transport, TransportFailure};

/// Executes a request body and returns the response text.
pub trait RequestExecutor: Send + Sync {
    fn execute_request(
        &self,
        body: &str,
    ) -> impl Future<Output = Result<String, ExecutionError>> + Send;
}

/// Wraps a [`Transport`] with failure classification and bounded retries.
#[derive(Debug, Clone)]
pub struct RetryExecutor<T, H = TracingHook> {
    transport: T,
    policy: RetryPolicy,
    hook: H,
    metrics_enabled: bool,
}

impl<T: Transport> RetryExecutor<T, TracingHook> {
    /// Executor with the default policy (3 attempts, transient failures only).
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, RetryPolicy::default())
    }

    pub fn with_policy(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            hook: TracingHook,
            metrics_enabled: true,
        }
    }
}

impl RetryExecutor<HttpTransport, TracingHook> {
    /// Build an HTTP-backed executor from a validated configuration.
    pub fn from_config(config: &ExecutorConfig) -> Result<Self, TransportFailure> {
        let transport = HttpTransport::from_config(&config.endpoint)?;
        let policy = RetryPolicy::from_config(&config.retries);
        Ok(Self::with_policy(transport, policy).with_metrics(config.observability.metrics_enabled))
    }
}

impl<T, H> RetryExecutor<T, H> {
    /// Replace the retry hook.
    pub fn with_hook<H2>(self, hook: H2) -> RetryExecutor<T, H2> {
        RetryExecutor {
            transport: self.transport,
            policy: self.policy,
            hook,
            metrics_enabled: self.metrics_enabled,
        }
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport, H: RetryHook> RetryExecutor<T, H> {
    /// Deliver `body`, retrying transient failures up to the attempt budget.
    ///
    /// Dropping the returned future aborts the in-flight attempt.
    pub async fn execute_request(&self, body: &str) -> Result<String, ExecutionError> {
        self.run(body, std::future::pending::<()>()).await
    }

    /// Like [`execute_request`](Self::execute_request), but stops with
    /// [`ExecutionError::Cancelled`] as soon as `cancel` is triggered.
    ///
    /// A handle cancelled beforehand stops the execution before any attempt.
    pub async fn execute_request_until(
        &self,
        body: &str,
        cancel: &CancelHandle,
    ) -> Result<String, ExecutionError> {
        if cancel.is_cancelled() {
            return Err(self.cancelled(0, Instant::now()));
        }
        self.run(body, cancel.cancelled()).await
    }

    /// Serialize `request` to JSON, execute it, and deserialize the response.
    pub async fn execute_json<Req, Resp>(&self, request: &Req) -> Result<Resp, ExecutionError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_string(request).map_err(ExecutionError::Encode)?;
        let response = self.execute_request(&body).await?;
        serde_json::from_str(&response).map_err(ExecutionError::Decode)
    }

    async fn run<C>(&self, body: &str, cancel: C) -> Result<String, ExecutionError>
    where
        C: Future<Output = ()>,
    {
        let execution_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "execute",
            execution_id = %execution_id,
            max_attempts = self.policy.max_attempts()
        );
        self.attempt_loop(body, cancel).instrument(span).await
    }

    async fn attempt_loop<C>(&self, body: &str, cancel: C) -> Result<String, ExecutionError>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let start = Instant::now();
        let mut attempt: u32 = 1;

        loop {
            tracing::debug!(attempt = attempt, body_len = body.len(), "Starting attempt");

            let outcome = tokio::select! {
                biased;
                _ = &mut cancel => {
                    return Err(self.cancelled(attempt, start));
                }
                outcome = self.transport.call(body) => outcome,
            };

            let failure = match outcome {
                Ok(response) => {
                    self.record_attempt("success");
                    self.record_execution("success", attempt, start);
                    self.hook.on_success(attempt);
                    return Ok(response);
                }
                Err(failure) => failure,
            };

            let kind = classify(&failure);
            self.record_attempt(kind.as_str());
            tracing::debug!(
                attempt = attempt,
                kind = kind.as_str(),
                error = %failure,
                "Attempt failed"
            );

            if !self.should_retry(&failure, kind, attempt) {
                self.record_execution("failed", attempt, start);
                self.hook.on_give_up(&failure, kind, attempt);
                return Err(ExecutionError::Transport(failure));
            }

            let delay = self.policy.backoff().delay(attempt);
            attempt += 1;
            self.hook.on_retry(&failure, attempt);

            if !delay.is_zero() {
                tracing::debug!(attempt = attempt, delay = ?delay, "Waiting before retry");
                tokio::select! {
                    biased;
                    _ = &mut cancel => {
                        return Err(self.cancelled(attempt - 1, start));
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    fn should_retry(&self, failure: &TransportFailure, kind: FailureKind, attempt: u32) -> bool {
        !failure.is_unexpected()
            && self.policy.is_retriable(kind)
            && attempt < self.policy.max_attempts()
    }

    fn cancelled(&self, attempts: u32, start: Instant) -> ExecutionError {
        tracing::warn!(attempts = attempts, "Execution cancelled");
        self.record_execution("cancelled", attempts, start);
        ExecutionError::Cancelled { attempts }
    }

    fn record_attempt(&self, outcome: &'static str) {
        if self.metrics_enabled {
            metrics::record_attempt(outcome);
        }
    }

    fn record_execution(&self, outcome: &'static str, attempts: u32, start: Instant) {
        if self.metrics_enabled {
            metrics::record_execution(outcome, attempts, start);
        }
    }
}

impl<T: Transport, H: RetryHook> RequestExecutor for RetryExecutor<T, H> {
    fn execute_request(
        &self,
        body: &str,
    ) -> impl Future<Output = Result<String, ExecutionError>> + Send {
        RetryExecutor::execute_request(self, body)
    }
}
