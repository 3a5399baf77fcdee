//! Shared utilities for integration tests: a programmable mock secret service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use vault_toolkit::config::{ApiConfig, HttpClientConfig};
use vault_toolkit::VaultConfig;

/// What the mock saw of one request.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub token: Option<String>,
}

/// Handle to a running mock.
#[derive(Debug, Clone)]
pub struct MockVault {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl MockVault {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests that reached the mock.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a programmable mock; the handler returns `(status, body)` per request.
pub async fn start_programmable_vault<F, Fut>(f: F) -> MockVault
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut reader = BufReader::new(read_half);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                            return;
                        }
                        let mut parts = request_line.split_whitespace();
                        let method = parts.next().unwrap_or_default().to_string();
                        // the native client always appends an (empty) query string
                        let target = parts.next().unwrap_or_default();
                        let path = target.split('?').next().unwrap_or_default().to_string();

                        let mut token = None;
                        loop {
                            let mut line = String::new();
                            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                                break;
                            }
                            let line = line.trim_end();
                            if line.is_empty() {
                                break;
                            }
                            if let Some((name, value)) = line.split_once(':') {
                                if name.eq_ignore_ascii_case("x-vault-token") {
                                    token = Some(value.trim().to_string());
                                }
                            }
                        }

                        counter.fetch_add(1, Ordering::SeqCst);
                        let (status, body) = f(MockRequest { method, path, token }).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = write_half.write_all(response_str.as_bytes()).await;
                        let _ = write_half.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockVault { addr, hits }
}

/// Start a mock that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_mock_vault(status: u16, body: &'static str) -> MockVault {
    start_programmable_vault(move |_| async move { (status, body.to_string()) }).await
}

/// Config pointing at `mock` with small, test-friendly limits.
#[allow(dead_code)]
pub fn test_config(
    mock: &MockVault,
    error_threshold: u32,
    breaker_timeout_secs: u64,
) -> VaultConfig {
    let mut config = VaultConfig::new(mock.url(), "dev-secret-token");
    config.http_client_config = Some(HttpClientConfig {
        limit_pool_client_timeout_seconds: 1,
        ..HttpClientConfig::default()
    });
    config.api_config = Some(ApiConfig {
        limit_breaker_error_threshold: error_threshold,
        limit_breaker_success_threshold: 1,
        limit_breaker_timeout: breaker_timeout_secs,
        http_client_pool_timeout_sec: None,
    });
    config
}
