//! Resilient secret-service client library.
//!
//! A pooled HTTP transport and a shared circuit breaker around reads of
//! Vault-style secrets, with decoding for both the legacy flat and the
//! versioned nested response shapes.

pub mod config;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod vault;

pub use config::schema::VaultConfig;
pub use resilience::{CircuitBreaker, CircuitState};
pub use vault::{SecretClient, SecretResponseData, VaultError, VaultResult};
