//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rest_executor::{Transport, TransportFailure};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the mock backend does with one connection.
#[allow(dead_code)]
pub enum Reply {
    /// Respond immediately.
    Respond { status: u16, body: String },
    /// Wait, then respond.
    Delayed { delay: Duration, status: u16, body: String },
    /// Read the request and close the connection without responding.
    Close,
    /// Announce `declared` body bytes, send only `body`, then close.
    Truncated { declared: usize, body: String },
}

#[allow(dead_code)]
impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Respond { status: 200, body: body.to_string() }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond { status, body: body.to_string() }
    }

    pub fn delayed(delay_ms: u64, body: &str) -> Self {
        Reply::Delayed {
            delay: Duration::from_millis(delay_ms),
            status: 200,
            body: body.to_string(),
        }
    }
}

/// A running mock backend.
pub struct Backend {
    pub addr: SocketAddr,
    /// Raw text of every request received, in arrival order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl Backend {
    pub fn url(&self) -> String {
        format!("http://{}/submit", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the 0-based connection index and the request body.
pub async fn start_programmable_backend<F>(f: F) -> Backend
where
    F: Fn(u32, &str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);
    let counter = Arc::new(AtomicU32::new(0));

    let captured = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let captured = captured.clone();
                    let index = counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        let raw = match read_request(&mut socket).await {
                            Ok(raw) => raw,
                            Err(_) => return,
                        };
                        let body = raw.split("\r\n\r\n").nth(1).unwrap_or("").to_string();
                        captured.lock().unwrap().push(raw);

                        let (status, body) = match f(index, &body) {
                            Reply::Respond { status, body } => (status, body),
                            Reply::Delayed { delay, status, body } => {
                                tokio::time::sleep(delay).await;
                                (status, body)
                            }
                            Reply::Close => {
                                let _ = socket.shutdown().await;
                                return;
                            }
                            Reply::Truncated { declared, body } => {
                                let head = format!(
                                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
                                    declared
                                );
                                let _ = socket.write_all(head.as_bytes()).await;
                                let _ = socket.write_all(body.as_bytes()).await;
                                let _ = socket.shutdown().await;
                                return;
                            }
                        };

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    Backend { addr, requests }
}

/// Start a backend that always answers 200 with a fixed body.
#[allow(dead_code)]
pub async fn start_mock_backend(response: &'static str) -> Backend {
    start_programmable_backend(move |_, _| Reply::ok(response)).await
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Transport wrapper that counts calls made by the executor.
pub struct CountingTransport<T> {
    inner: T,
    calls: AtomicU32,
}

impl<T> CountingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: Transport> Transport for CountingTransport<T> {
    async fn call(&self, body: &str) -> Result<String, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.call(body).await
    }
}
