//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the host is an absolute http(s) URL
//! - Validate value ranges (timeouts > 0, thresholds > 0)
//! - Check idle pool limits are consistent
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: VaultConfig → Result<(), Vec<ValidationError>>
//! - Runs before a client is built from the config

use url::Url;

use crate::config::schema::VaultConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Option name the problem refers to.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &VaultConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.vault_host.trim().is_empty() {
        errors.push(ValidationError::new("VaultHost", "must not be empty"));
    } else {
        match Url::parse(&config.vault_host) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::new(
                "VaultHost",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "VaultHost",
                format!("invalid URL '{}': {}", config.vault_host, e),
            )),
        }
    }

    let pool = config.http_client();
    if pool.limit_pool_client_timeout_seconds == 0 {
        errors.push(ValidationError::new(
            "LimitPoolClientTimeoutSeconds",
            "must be greater than zero",
        ));
    }
    if pool.limit_pool_transport_max_idle_conns_per_host
        > pool.limit_pool_transport_max_idle_conns
    {
        errors.push(ValidationError::new(
            "LimitPoolTransportMaxIdleConnsPerHost",
            format!(
                "{} exceeds LimitPoolTransportMaxIdleConns ({})",
                pool.limit_pool_transport_max_idle_conns_per_host,
                pool.limit_pool_transport_max_idle_conns
            ),
        ));
    }

    let api = config.api();
    if api.limit_breaker_error_threshold == 0 {
        errors.push(ValidationError::new(
            "LimitBreakerErrorThreshold",
            "must be greater than zero",
        ));
    }
    if api.limit_breaker_success_threshold == 0 {
        errors.push(ValidationError::new(
            "LimitBreakerSuccessThreshold",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
