//! Metrics collection.
//!
//! # Metrics
//! - `executor_attempts_total` (counter): transport calls by outcome
//! - `executor_executions_total` (counter): finished executions by outcome
//! - `executor_execution_attempts` (histogram): attempts per execution
//! - `executor_execution_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed recorder every call is a no-op
//! - Exporting is left to the embedding application

use std::time::Instant;

/// Record the outcome of one transport call ("success", "transient", "permanent").
pub fn record_attempt(outcome: &'static str) {
    metrics::counter!("executor_attempts_total", "outcome" => outcome).increment(1);
}

/// Record a finished execution ("success", "failed", "cancelled").
pub fn record_execution(outcome: &'static str, attempts: u32, start: Instant) {
    metrics::counter!("executor_executions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("executor_execution_attempts").record(f64::from(attempts));
    metrics::histogram!("executor_execution_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
