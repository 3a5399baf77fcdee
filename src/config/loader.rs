//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::VaultConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the secret service address.
pub const ENV_VAULT_ADDR: &str = "VAULT_ADDR";
/// Environment variable holding the static token.
pub const ENV_VAULT_TOKEN: &str = "VAULT_TOKEN";
/// Environment variable holding the default secret path.
pub const ENV_VAULT_SECRET_PATH: &str = "VAULT_SECRET_PATH";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, overlay the environment, and validate.
pub fn load_config(path: &Path) -> Result<VaultConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: VaultConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), host = %config.vault_host, "Configuration loaded");
    Ok(config)
}

/// Build a configuration purely from the environment.
pub fn from_env() -> Result<VaultConfig, ConfigError> {
    let mut config = VaultConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay `VAULT_ADDR`, `VAULT_TOKEN` and `VAULT_SECRET_PATH` onto a config.
///
/// Takes a lookup function so callers (and tests) decide where values come from.
pub fn apply_env_overrides<F>(config: &mut VaultConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ENV_VAULT_ADDR).filter(|v| !v.is_empty()) {
        config.vault_host = addr;
    }
    if let Some(token) = lookup(ENV_VAULT_TOKEN).filter(|v| !v.is_empty()) {
        config.vault_token = token;
    }
    if let Some(path) = lookup(ENV_VAULT_SECRET_PATH).filter(|v| !v.is_empty()) {
        config.secret_path = path;
    }
}
