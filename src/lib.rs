//! Resilient HTTP request executor
//!
//! Delivers a request body to a fixed endpoint, classifies failures as
//! transient or permanent, and retries transient failures a bounded number
//! of times.

pub mod config;
pub mod observability;
pub mod resilience;
pub mod transport;

pub use config::schema::ExecutorConfig;
pub use resilience::{ExecutionError, FailureKind, RequestExecutor, RetryExecutor, RetryPolicy};
pub use transport::{ConnectionStatus, HttpTransport, Transport, TransportFailure};
