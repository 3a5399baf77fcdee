//! Secret service client subsystem.
//!
//! # Data Flow
//! ```text
//! SecretClient::fetch_*
//!     → resilience::CircuitBreaker::run (admit or fail fast)
//!     → net::pool client: GET {host}/v1/{path} + X-Vault-Token
//!         (fetch_kv_map: native KV v2 read under a deadline)
//!     → status check → full body read → response.rs decode
//!     → outcome reported to the breaker
//! ```
//!
//! # Design Decisions
//! - Decode only happens on 200 OK
//! - Status, body-read and decode failures are distinct errors
//! - Breaker state is shared by all paths and fetch variants

pub mod client;
pub mod response;
pub mod types;

pub use client::{SecretClient, KV_MOUNT, VAULT_TOKEN_HEADER};
pub use response::{
    decode_raw, decode_secret, RawSecretData, RawSecretEnvelope, SecretEnvelope, SecretResponseData,
    SecretShape,
};
pub use types::{VaultError, VaultResult};
