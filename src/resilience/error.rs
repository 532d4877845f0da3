//! Terminal execution errors.

use thiserror::Error;

use crate::resilience::classify::{classify, FailureKind};
use crate::transport::TransportFailure;

/// Error returned to the caller of an execution.
///
/// A failed execution surfaces the last attempt's failure itself; earlier
/// attempts are not kept.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The last attempt's transport failure.
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// The caller cancelled the execution.
    #[error("execution cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    /// The request value could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response text could not be deserialized from JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ExecutionError {
    pub fn transport(&self) -> Option<&TransportFailure> {
        match self {
            ExecutionError::Transport(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn into_transport(self) -> Option<TransportFailure> {
        match self {
            ExecutionError::Transport(failure) => Some(failure),
            _ => None,
        }
    }

    /// Classification of the terminal transport failure, if any.
    pub fn kind(&self) -> Option<FailureKind> {
        self.transport().map(classify)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ConnectionStatus;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_transport_error_is_transparent() {
        let err = ExecutionError::from(TransportFailure::connection(
            ConnectionStatus::Timeout,
            io::Error::new(io::ErrorKind::TimedOut, "attempt 3 timed out"),
        ));

        assert_eq!(err.to_string(), "connection failure (timeout): attempt 3 timed out");
        assert_eq!(err.source().unwrap().to_string(), "attempt 3 timed out");
        assert_eq!(err.kind(), Some(FailureKind::Transient));
    }

    #[test]
    fn test_cancelled() {
        let err = ExecutionError::Cancelled { attempts: 2 };
        assert!(err.is_cancelled());
        assert!(err.kind().is_none());
        assert!(err.into_transport().is_none());
    }
}
