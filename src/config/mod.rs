//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (VAULT_ADDR / VAULT_TOKEN / VAULT_SECRET_PATH overlay)
//!     → validation.rs (semantic checks)
//!     → VaultConfig (validated, immutable)
//!     → SecretClient::new resolves unset limits to defaults
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a client is built from it
//! - Unset pool/breaker groups fall back to fixed defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ApiConfig;
pub use schema::HttpClientConfig;
pub use schema::VaultConfig;
pub use validation::{validate_config, ValidationError};
