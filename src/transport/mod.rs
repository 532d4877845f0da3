//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! RetryExecutor
//!     → Transport::call(body)      (one attempt)
//!     → http.rs (POST, per-call timeout, connection scoped to the call)
//!     → Ok(response text) | Err(TransportFailure with cause code)
//! ```
//!
//! # Design Decisions
//! - The transport never retries and never classifies
//! - Failures keep the underlying error as their `source()`
//! - Implementations must be safe to call concurrently

use std::future::Future;
use std::sync::Arc;

pub mod error;
pub mod http;

pub use error::{BoxError, ConnectionStatus, TransportFailure};
pub use http::HttpTransport;

/// A single-shot request transport.
pub trait Transport: Send + Sync {
    /// Deliver `body` once and return the full response text.
    fn call(&self, body: &str) -> impl Future<Output = Result<String, TransportFailure>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn call(&self, body: &str) -> impl Future<Output = Result<String, TransportFailure>> + Send {
        (**self).call(body)
    }
}
