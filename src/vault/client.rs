//! Breaker-guarded secret client.
//!
//! # Responsibilities
//! - Own the pooled HTTP client and the shared circuit breaker
//! - Issue `GET {host}/v1/{path}` with the static token
//! - Check status, read the whole body, then decode (first failure wins)
//! - Read KV v2 secrets through the native client under a deadline

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};

use crate::config::{validate_config, VaultConfig};
use crate::net::pool::build_pooled_client;
use crate::observability::metrics;
use crate::resilience::{with_deadline, BreakerSettings, CircuitBreaker, CircuitState};
use crate::vault::response::{
    decode_raw, RawSecretEnvelope, SecretEnvelope, SecretResponseData, SecretShape,
};
use crate::vault::types::{VaultError, VaultResult};

/// Header carrying the static token.
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";
/// Mount of the versioned KV engine read by [`SecretClient::fetch_kv_map`].
pub const KV_MOUNT: &str = "kv";

/// Client for reading secrets, safe to clone and share across tasks.
///
/// Clones share one connection pool and one breaker.
#[derive(Clone)]
pub struct SecretClient {
    config: Arc<VaultConfig>,
    http: reqwest::Client,
    native: Arc<VaultClient>,
    breaker: Arc<CircuitBreaker>,
}

impl SecretClient {
    /// Build a client from a configuration.
    ///
    /// Unset pool and breaker limits are replaced with their defaults. No
    /// network call happens here.
    pub fn new(config: VaultConfig) -> VaultResult<Self> {
        validate_config(&config).map_err(|errors| {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            VaultError::Config(joined.join(", "))
        })?;

        let config = config.resolved();
        let http = build_pooled_client(&config.http_client())?;
        let native = build_native_client(&config)?;
        let breaker = CircuitBreaker::new(BreakerSettings::from(&config.api()));

        tracing::info!(
            vault_host = %config.vault_host,
            request_timeout_secs = config.http_client().limit_pool_client_timeout_seconds,
            breaker_error_threshold = breaker.settings().error_threshold,
            breaker_success_threshold = breaker.settings().success_threshold,
            "Secret client initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            http,
            native: Arc::new(native),
            breaker: Arc::new(breaker),
        })
    }

    /// The resolved configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Fetch a secret and return its response data.
    ///
    /// `use_legacy_shape` selects the flat envelope; otherwise the versioned
    /// (nested) envelope is expected.
    pub async fn fetch_secret(
        &self,
        path: &str,
        use_legacy_shape: bool,
    ) -> VaultResult<SecretResponseData> {
        let shape = SecretShape::from_legacy_flag(use_legacy_shape);
        self.guarded("secret", path, || async move {
            let body = self.read_secret_body(path).await?;
            let envelope = SecretEnvelope::decode(&body, shape)?;
            Ok(envelope.into_data())
        })
        .await
    }

    /// Fetch a secret and return the whole nested envelope.
    ///
    /// `T` is the caller's own shape for the innermost secret content.
    pub async fn fetch_raw_secret<T>(&self, path: &str) -> VaultResult<RawSecretEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        self.guarded("raw", path, || async move {
            let body = self.read_secret_body(path).await?;
            Ok(decode_raw(&body)?)
        })
        .await
    }

    /// Read a KV v2 secret under the `kv` mount as a string-keyed map.
    ///
    /// Bounded by the configured request timeout; expiry yields
    /// [`VaultError::DeadlineExceeded`].
    pub async fn fetch_kv_map(
        &self,
        path: &str,
    ) -> VaultResult<HashMap<String, serde_json::Value>> {
        let deadline = self.config.http_client().request_timeout();
        self.guarded("kv_map", path, || async move {
            let read = vaultrs::kv2::read(self.native.as_ref(), KV_MOUNT, path);
            let secret: Result<HashMap<String, serde_json::Value>, _> =
                with_deadline(deadline, read).await?;
            secret.map_err(|e| VaultError::Native(e.to_string()))
        })
        .await
    }

    /// [`fetch_secret`](Self::fetch_secret) at the configured `SecretPath`.
    pub async fn fetch_configured_secret(
        &self,
        use_legacy_shape: bool,
    ) -> VaultResult<SecretResponseData> {
        let path = self.configured_path()?;
        self.fetch_secret(path, use_legacy_shape).await
    }

    /// [`fetch_kv_map`](Self::fetch_kv_map) at the configured `SecretPath`.
    pub async fn fetch_configured_kv_map(&self) -> VaultResult<HashMap<String, serde_json::Value>> {
        let path = self.configured_path()?;
        self.fetch_kv_map(path).await
    }

    fn configured_path(&self) -> VaultResult<&str> {
        let path = self.config.secret_path.as_str();
        if path.is_empty() {
            return Err(VaultError::Config("SecretPath is not configured".to_string()));
        }
        Ok(path)
    }

    /// `{host}/v1/{path}`, tolerating a trailing slash on the host.
    pub fn secret_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.config.vault_host.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// One GET: status check, then full body read.
    async fn read_secret_body(&self, path: &str) -> VaultResult<Vec<u8>> {
        let response = self
            .http
            .get(self.secret_url(path))
            .header(VAULT_TOKEN_HEADER, &self.config.vault_token)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(VaultError::http_status(status, body));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn guarded<T, F, Fut>(
        &self,
        variant: &'static str,
        path: &str,
        operation: F,
    ) -> VaultResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = VaultResult<T>>,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("vault_fetch", %request_id, variant, path = %path);
        let started = Instant::now();

        let result = self
            .breaker
            .run(operation)
            .instrument(span.clone())
            .await
            .map_err(VaultError::from);

        let outcome = match &result {
            Ok(_) => "ok",
            Err(VaultError::BreakerOpen) => "rejected",
            Err(_) => "error",
        };
        metrics::record_fetch(variant, outcome, started.elapsed());

        span.in_scope(|| match &result {
            Ok(_) => {
                tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Secret fetched")
            }
            Err(VaultError::BreakerOpen) => {
                tracing::debug!("Fetch rejected by open circuit breaker")
            }
            Err(e) => {
                tracing::warn!(error = %e, breaker = %self.breaker.state(), "Secret fetch failed")
            }
        });

        result
    }
}

fn build_native_client(config: &VaultConfig) -> VaultResult<VaultClient> {
    let mut settings_builder = VaultClientSettingsBuilder::default();
    settings_builder.address(config.vault_host.as_str());
    settings_builder.token(config.vault_token.as_str());

    let settings = settings_builder
        .build()
        .map_err(|e| VaultError::Config(format!("Invalid Vault client settings: {}", e)))?;

    VaultClient::new(settings)
        .map_err(|e| VaultError::Native(format!("Failed to create Vault client: {}", e)))
}

impl std::fmt::Debug for SecretClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretClient")
            .field("vault_host", &self.config.vault_host)
            .field("secret_path", &self.config.secret_path)
            .field("breaker_state", &self.breaker.state())
            .finish()
    }
}
