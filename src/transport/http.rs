//! HTTP transport over reqwest.
//!
//! # Responsibilities
//! - POST one JSON body per call to the configured endpoint
//! - Bound each call (send + full body read) by the configured timeout
//! - Map reqwest/hyper/io errors onto a [`ConnectionStatus`] cause code
//!
//! # Design Decisions
//! - Idle pooling is disabled: every call opens its own connection and the
//!   connection is released when the call's future completes or is dropped
//! - Timeout uses `tokio::time::timeout`, so a timed-out call drops the
//!   in-flight request instead of leaving it running
//! - Non-2xx responses are read to completion and returned as failures

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::time::timeout;
use url::Url;

use crate::config::validation::validate_url;
use crate::config::EndpointConfig;
use crate::transport::error::{ConnectionStatus, TransportFailure};
use crate::transport::Transport;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Transport that POSTs request bodies to a fixed HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `url` with a per-call `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, TransportFailure> {
        let url = validate_url(url).map_err(TransportFailure::unexpected)?;
        if timeout.is_zero() {
            return Err(TransportFailure::unexpected("transport timeout must be greater than zero"));
        }

        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(TransportFailure::unexpected)?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self, TransportFailure> {
        Self::new(&config.url, config.timeout())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn post(&self, body: &str) -> Result<String, TransportFailure> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.to_owned())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        String::from_utf8(bytes.to_vec()).map_err(TransportFailure::unexpected)
    }
}

impl Transport for HttpTransport {
    async fn call(&self, body: &str) -> Result<String, TransportFailure> {
        match timeout(self.timeout, self.post(body)).await {
            Ok(result) => result,
            Err(elapsed) => {
                tracing::debug!(url = %self.url, timeout = ?self.timeout, "Attempt timed out");
                Err(TransportFailure::connection(ConnectionStatus::Timeout, elapsed))
            }
        }
    }
}

/// Assign a cause code to a reqwest error by inspecting its source chain.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportFailure {
    if err.is_builder() {
        return TransportFailure::unexpected(err);
    }

    let status = if err.is_timeout() {
        Some(ConnectionStatus::Timeout)
    } else if err.is_connect() {
        Some(connect_status(&err))
    } else if err.is_request() {
        Some(chain_status(&err).unwrap_or(ConnectionStatus::SendFailure))
    } else if err.is_body() || err.is_decode() {
        Some(chain_status(&err).unwrap_or(ConnectionStatus::ReceiveFailure))
    } else {
        chain_status(&err)
    };

    match status {
        Some(status) => TransportFailure::connection(status, err),
        None => TransportFailure::unexpected(err),
    }
}

fn connect_status(err: &reqwest::Error) -> ConnectionStatus {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if cause.to_string().contains("dns error") {
            return ConnectionStatus::NameResolutionFailure;
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::TimedOut => return ConnectionStatus::Timeout,
                io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                    return ConnectionStatus::ConnectionClosed
                }
                _ => {}
            }
        }
        source = cause.source();
    }
    ConnectionStatus::ConnectFailure
}

fn chain_status(err: &reqwest::Error) -> Option<ConnectionStatus> {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                return Some(ConnectionStatus::ConnectionClosed);
            }
            if hyper_err.is_canceled() {
                return Some(ConnectionStatus::RequestCanceled);
            }
            if hyper_err.is_timeout() {
                return Some(ConnectionStatus::Timeout);
            }
            if hyper_err.is_parse() || hyper_err.is_parse_status() {
                return Some(ConnectionStatus::ProtocolError);
            }
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof => return Some(ConnectionStatus::ConnectionClosed),
                io::ErrorKind::TimedOut => return Some(ConnectionStatus::Timeout),
                _ => {}
            }
        }
        source = cause.source();
    }
    None
}
