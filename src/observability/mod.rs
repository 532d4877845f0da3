//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resilience + transport produce:
//!     → logging.rs (structured log events, one span per execution)
//!     → metrics.rs (attempt and execution counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stderr, pretty or JSON)
//!     → Whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Execution ID (UUID v4) on every event of one execution
//! - Metrics are cheap (facade calls, no-op without a recorder)

pub mod logging;
pub mod metrics;
