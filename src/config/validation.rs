//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, at least one attempt)
//! - Reject log levels and formats the subscriber would not understand
//! - Check the endpoint URL is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExecutorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ExecutorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint.url '{url}' is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("endpoint.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("retries.max_attempts must be at least 1")]
    NoAttempts,

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    DelayRange { base: u64, max: u64 },

    #[error("observability.log_level '{0}' is not one of: trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.log_format '{0}' is not one of: pretty, json")]
    LogFormat(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ExecutorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_url(&config.endpoint.url) {
        errors.push(e);
    }

    if config.endpoint.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::DelayRange {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    match config.observability.log_level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => errors.push(ValidationError::LogLevel(config.observability.log_level.clone())),
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::LogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `raw` is an absolute http or https URL.
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}
