//! Failure classification.
//!
//! Only three connection-level cause codes are transient: the connection was
//! closed, the attempt timed out, or the request was canceled. Every other
//! failure, including a completed request with a non-success HTTP status, is
//! permanent.

use crate::transport::{ConnectionStatus, TransportFailure};

/// Whether a failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Transient,
    Permanent,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transient => "transient",
            FailureKind::Permanent => "permanent",
        }
    }
}

const TRANSIENT_STATUSES: [ConnectionStatus; 3] = [
    ConnectionStatus::ConnectionClosed,
    ConnectionStatus::Timeout,
    ConnectionStatus::RequestCanceled,
];

/// Classify a transport failure. Pure and total.
pub fn classify(failure: &TransportFailure) -> FailureKind {
    match failure {
        TransportFailure::Connection { status, .. } if TRANSIENT_STATUSES.contains(status) => {
            FailureKind::Transient
        }
        TransportFailure::Connection { .. } => FailureKind::Permanent,
        TransportFailure::Status { .. } => FailureKind::Permanent,
        TransportFailure::Unexpected(_) => FailureKind::Permanent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn connection(status: ConnectionStatus) -> TransportFailure {
        TransportFailure::connection(status, io::Error::new(io::ErrorKind::Other, "boom"))
    }

    #[test]
    fn test_transient_statuses() {
        for status in [
            ConnectionStatus::ConnectionClosed,
            ConnectionStatus::Timeout,
            ConnectionStatus::RequestCanceled,
        ] {
            assert_eq!(classify(&connection(status)), FailureKind::Transient, "{status}");
        }
    }

    #[test]
    fn test_permanent_statuses() {
        for status in [
            ConnectionStatus::NameResolutionFailure,
            ConnectionStatus::ConnectFailure,
            ConnectionStatus::SendFailure,
            ConnectionStatus::ReceiveFailure,
            ConnectionStatus::ProtocolError,
        ] {
            assert_eq!(classify(&connection(status)), FailureKind::Permanent, "{status}");
        }
    }

    #[test]
    fn test_http_statuses_are_permanent() {
        for status in [400, 404, 429, 500, 502, 503, 504] {
            let failure = TransportFailure::Status {
                status,
                body: String::new(),
            };
            assert_eq!(classify(&failure), FailureKind::Permanent, "HTTP {status}");
        }
    }

    #[test]
    fn test_unexpected_is_permanent() {
        let failure = TransportFailure::unexpected("invalid header");
        assert_eq!(classify(&failure), FailureKind::Permanent);
    }

    #[test]
    fn test_classification_is_stable() {
        let failure = connection(ConnectionStatus::Timeout);
        let first = classify(&failure);
        for _ in 0..10 {
            assert_eq!(classify(&failure), first);
        }
    }
}
