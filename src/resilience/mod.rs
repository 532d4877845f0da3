//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! execute_request(body):
//!     → executor.rs (attempt loop, one transport call in flight at a time)
//!     → On failure: classify.rs (transient or permanent)
//!     → policy.rs (retriable kind? attempts left?)
//!     → hooks.rs (on_retry / on_success / on_give_up)
//!     → backoff.rs (optional delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Classification is a pure function of the failure, never of retry state
//! - Only connection closed, timeout and request canceled are transient
//! - HTTP error statuses are permanent
//! - Exhaustion surfaces the last failure itself, not a wrapper
//! - Cancellation is terminal and never retried

pub mod backoff;
pub mod cancel;
pub mod classify;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod policy;

pub use backoff::Backoff;
pub use cancel::CancelHandle;
pub use classify::{classify, FailureKind};
pub use error::ExecutionError;
pub use executor::{RequestExecutor, RetryExecutor};
pub use hooks::{NoopHook, RetryHook, TracingHook};
pub use policy::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
