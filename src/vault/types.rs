//! Error definitions for secret fetches.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::resilience::{CircuitBreakerError, DeadlineExceeded};

/// Errors that can occur while fetching a secret.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// DNS, connect, TLS, timeout or body-read failure of the pooled client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The breaker rejected the call without touching the network.
    #[error("circuit breaker is open")]
    BreakerOpen,

    /// The service answered with something other than 200 OK.
    #[error("{status_text} (status {status})")]
    HttpStatus {
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    /// The body was not valid JSON or did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The native KV client reported an error.
    #[error("vault client error: {0}")]
    Native(String),

    /// A deadline-bounded read did not finish in time.
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl VaultError {
    pub(crate) fn http_status(status: StatusCode, body: Option<String>) -> Self {
        VaultError::HttpStatus {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            body,
        }
    }

    /// HTTP status code, for status failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            VaultError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_breaker_open(&self) -> bool {
        matches!(self, VaultError::BreakerOpen)
    }

    /// True for request timeouts of the pool and for explicit deadlines.
    pub fn is_timeout(&self) -> bool {
        match self {
            VaultError::Transport(e) => e.is_timeout(),
            VaultError::DeadlineExceeded(_) => true,
            _ => false,
        }
    }
}

impl From<CircuitBreakerError<VaultError>> for VaultError {
    fn from(err: CircuitBreakerError<VaultError>) -> Self {
        match err {
            CircuitBreakerError::Open => VaultError::BreakerOpen,
            CircuitBreakerError::Inner(e) => e,
        }
    }
}

impl From<DeadlineExceeded> for VaultError {
    fn from(err: DeadlineExceeded) -> Self {
        VaultError::DeadlineExceeded(err.0)
    }
}

/// Result type for secret fetches.
pub type VaultResult<T> = Result<T, VaultError>;
