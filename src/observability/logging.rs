//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Configure log level from `RUST_LOG` or an explicit default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` always wins over the programmatic default

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor a level is given.
pub const DEFAULT_FILTER: &str = "vault_toolkit=info";

/// Build the env filter, preferring `RUST_LOG`.
pub fn env_filter(default_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match default_level {
            Some(level) => format!("vault_toolkit={}", level),
            None => DEFAULT_FILTER.to_string(),
        };
        EnvFilter::new(directive)
    })
}

/// Install a global fmt subscriber. Safe to call more than once.
pub fn init_logging(default_level: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
