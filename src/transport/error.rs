//! Transport failure types.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed underlying cause of a transport failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Cause code attached to a connection-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    /// The endpoint host name could not be resolved.
    NameResolutionFailure,
    /// No connection could be established (refused, unreachable).
    ConnectFailure,
    /// The connection was closed before a full response arrived.
    ConnectionClosed,
    /// The attempt did not complete within its timeout.
    Timeout,
    /// The in-flight request was canceled by the connection.
    RequestCanceled,
    /// Writing the request failed.
    SendFailure,
    /// Reading the response failed.
    ReceiveFailure,
    /// The peer violated the HTTP protocol.
    ProtocolError,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::NameResolutionFailure => "name resolution failure",
            ConnectionStatus::ConnectFailure => "connect failure",
            ConnectionStatus::ConnectionClosed => "connection closed",
            ConnectionStatus::Timeout => "timeout",
            ConnectionStatus::RequestCanceled => "request canceled",
            ConnectionStatus::SendFailure => "send failure",
            ConnectionStatus::ReceiveFailure => "receive failure",
            ConnectionStatus::ProtocolError => "protocol error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single transport call.
///
/// Carries the cause code and the underlying error; it does not say whether
/// the failure is worth retrying. See [`crate::resilience::classify`].
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// Connection-level failure.
    #[error("connection failure ({status}): {source}")]
    Connection {
        status: ConnectionStatus,
        #[source]
        source: BoxError,
    },

    /// The request completed with a non-success HTTP status.
    #[error("endpoint returned HTTP {status}")]
    Status { status: u16, body: String },

    /// Any error that is not a recognised connection-level failure.
    #[error("unexpected transport error: {0}")]
    Unexpected(#[source] BoxError),
}

impl TransportFailure {
    pub fn connection<E>(status: ConnectionStatus, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        TransportFailure::Connection {
            status,
            source: source.into(),
        }
    }

    pub fn unexpected<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        TransportFailure::Unexpected(source.into())
    }

    /// Connection cause code, if this is a connection-level failure.
    pub fn connection_status(&self) -> Option<ConnectionStatus> {
        match self {
            TransportFailure::Connection { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// HTTP status code, if the request completed with a non-success status.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            TransportFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(self, TransportFailure::Unexpected(_))
    }
}
