//! Configuration schema definitions.
//!
//! Keys follow the option names the secret-service tooling has always used
//! (`VaultHost`, `LimitBreakerErrorThreshold`, ...), so existing config files
//! deserialize unchanged.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout of the pooled client, in seconds.
pub const POOL_CLIENT_TIMEOUT_SECONDS: u64 = 5;
/// Default cap on idle connections across all hosts.
pub const POOL_TRANSPORT_MAX_IDLE_CONNS: usize = 100;
/// Default cap on idle connections per host.
pub const POOL_TRANSPORT_MAX_IDLE_CONNS_PER_HOST: usize = 2;
/// Default idle-connection lifetime, in seconds.
pub const POOL_TRANSPORT_IDLE_CONN_TIMEOUT_SECONDS: u64 = 90;

/// Default open-state timeout of the breaker, in seconds.
pub const BREAKER_TIMEOUT: u64 = 5;
/// Default consecutive failures that open the breaker.
pub const BREAKER_ERROR_THRESHOLD: u32 = 10;
/// Default consecutive half-open successes that close the breaker.
pub const BREAKER_SUCCESS_THRESHOLD: u32 = 1;

/// Root configuration for the secret client.
#[derive(Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct VaultConfig {
    /// Base URL of the secret service (e.g., "https://vault.internal:8200").
    pub vault_host: String,

    /// Static token sent as `X-Vault-Token`.
    pub vault_token: String,

    /// Secret path used by the `fetch_configured_*` helpers.
    pub secret_path: String,

    /// Pool limits. `None` means "use the defaults".
    pub http_client_config: Option<HttpClientConfig>,

    /// Breaker limits. `None` means "use the defaults".
    #[serde(rename = "APIConfig", alias = "ApiConfig")]
    pub api_config: Option<ApiConfig>,
}

impl VaultConfig {
    /// Create a config with the given host and token and default limits.
    pub fn new(vault_host: impl Into<String>, vault_token: impl Into<String>) -> Self {
        Self {
            vault_host: vault_host.into(),
            vault_token: vault_token.into(),
            ..Self::default()
        }
    }

    /// Replace unset sub-configs with their documented defaults.
    pub fn resolved(mut self) -> Self {
        if self.http_client_config.is_none() {
            self.http_client_config = Some(HttpClientConfig::default());
        }
        if self.api_config.is_none() {
            self.api_config = Some(ApiConfig::default());
        }
        self
    }

    /// Pool limits, falling back to defaults when unset.
    pub fn http_client(&self) -> HttpClientConfig {
        self.http_client_config.clone().unwrap_or_default()
    }

    /// Breaker limits, falling back to defaults when unset.
    pub fn api(&self) -> ApiConfig {
        self.api_config.clone().unwrap_or_default()
    }
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("vault_host", &self.vault_host)
            .field("vault_token", &"[REDACTED]")
            .field("secret_path", &self.secret_path)
            .field("http_client_config", &self.http_client_config)
            .field("api_config", &self.api_config)
            .finish()
    }
}

/// Connection pool limits of the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HttpClientConfig {
    /// Total request timeout in seconds.
    pub limit_pool_client_timeout_seconds: u64,

    /// Idle connection lifetime in seconds.
    pub limit_pool_transport_idle_conn_timeout_seconds: u64,

    /// Maximum idle connections kept across all hosts.
    pub limit_pool_transport_max_idle_conns: usize,

    /// Maximum idle connections kept per host.
    pub limit_pool_transport_max_idle_conns_per_host: usize,
}

impl HttpClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.limit_pool_client_timeout_seconds)
    }

    pub fn idle_conn_timeout(&self) -> Duration {
        Duration::from_secs(self.limit_pool_transport_idle_conn_timeout_seconds)
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            limit_pool_client_timeout_seconds: POOL_CLIENT_TIMEOUT_SECONDS,
            limit_pool_transport_idle_conn_timeout_seconds:
                POOL_TRANSPORT_IDLE_CONN_TIMEOUT_SECONDS,
            limit_pool_transport_max_idle_conns: POOL_TRANSPORT_MAX_IDLE_CONNS,
            limit_pool_transport_max_idle_conns_per_host: POOL_TRANSPORT_MAX_IDLE_CONNS_PER_HOST,
        }
    }
}

/// Circuit breaker limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ApiConfig {
    /// Consecutive failures (while closed) that open the breaker.
    pub limit_breaker_error_threshold: u32,

    /// Consecutive half-open successes that close the breaker.
    pub limit_breaker_success_threshold: u32,

    /// Open-state timeout in seconds.
    pub limit_breaker_timeout: u64,

    /// Legacy name for the open-state timeout. Takes precedence when set.
    pub http_client_pool_timeout_sec: Option<u64>,
}

impl ApiConfig {
    /// How long the breaker stays open before admitting a trial call.
    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(
            self.http_client_pool_timeout_sec
                .unwrap_or(self.limit_breaker_timeout),
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            limit_breaker_error_threshold: BREAKER_ERROR_THRESHOLD,
            limit_breaker_success_threshold: BREAKER_SUCCESS_THRESHOLD,
            limit_breaker_timeout: BREAKER_TIMEOUT,
            http_client_pool_timeout_sec: None,
        }
    }
}
