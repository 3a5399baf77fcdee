//! Command-line front end for the secret client.
//!
//! ```text
//! vault-toolkit [--config vault.toml] get <path> [--legacy]
//! vault-toolkit [--config vault.toml] raw <path>
//! vault-toolkit [--config vault.toml] kv [path]
//! ```
//!
//! Without `--config`, the client is built from `VAULT_ADDR`, `VAULT_TOKEN`
//! and `VAULT_SECRET_PATH`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use vault_toolkit::config::{loader, load_config};
use vault_toolkit::observability::logging;
use vault_toolkit::SecretClient;

#[derive(Parser)]
#[command(name = "vault-toolkit")]
#[command(about = "Read secrets through a pooled, breaker-guarded client", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a secret and print its response data
    Get {
        path: String,
        /// Expect the flat (v1) envelope instead of the nested one
        #[arg(long)]
        legacy: bool,
    },
    /// Fetch a secret and print the whole nested envelope
    Raw { path: String },
    /// Read a KV v2 secret under the `kv` mount (defaults to SecretPath)
    Kv { path: Option<String> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => loader::from_env()?,
    };
    let client = SecretClient::new(config)?;

    let output = match cli.command {
        Commands::Get { path, legacy } => {
            serde_json::to_value(client.fetch_secret(&path, legacy).await?)?
        }
        Commands::Raw { path } => {
            serde_json::to_value(client.fetch_raw_secret::<Value>(&path).await?)?
        }
        Commands::Kv { path: Some(path) } => {
            serde_json::to_value(client.fetch_kv_map(&path).await?)?
        }
        Commands::Kv { path: None } => {
            serde_json::to_value(client.fetch_configured_kv_map().await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
