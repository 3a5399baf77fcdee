//! Pooled HTTP transport.
//!
//! # Responsibilities
//! - Build one reusable `reqwest::Client` per secret client
//! - Bound idle connections and their lifetime
//! - Apply a fixed request timeout to every call
//!
//! No retries happen here; the breaker owns failure policy.

use reqwest::Client;

use crate::config::HttpClientConfig;

/// Effective limits applied to the transport after reconciling the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolLimits {
    pub request_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_idle_per_host: usize,
}

impl PoolLimits {
    /// Reconcile the configured limits.
    ///
    /// reqwest only exposes a per-host idle cap, so the total idle cap bounds it.
    /// The client only ever talks to one host, which makes the two equivalent.
    pub fn from_config(config: &HttpClientConfig) -> Self {
        Self {
            request_timeout_secs: config.limit_pool_client_timeout_seconds,
            idle_timeout_secs: config.limit_pool_transport_idle_conn_timeout_seconds,
            max_idle_per_host: config
                .limit_pool_transport_max_idle_conns_per_host
                .min(config.limit_pool_transport_max_idle_conns),
        }
    }
}

/// Build the pooled client from pool limits.
pub fn build_pooled_client(config: &HttpClientConfig) -> Result<Client, reqwest::Error> {
    let limits = PoolLimits::from_config(config);

    let client = Client::builder()
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(limits.max_idle_per_host)
        .pool_idle_timeout(config.idle_conn_timeout())
        .build()?;

    tracing::debug!(
        request_timeout_secs = limits.request_timeout_secs,
        idle_timeout_secs = limits.idle_timeout_secs,
        max_idle_per_host = limits.max_idle_per_host,
        "Pooled HTTP client built"
    );

    Ok(client)
}
