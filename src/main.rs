//! # Tokenize Registry
//!
//! Serves the in-memory tokenization registry over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Run with built-in defaults (127.0.0.1:3032, routes under /api/core)
//! tokenize-registry
//!
//! # Run with a configuration file and a seed snapshot
//! tokenize-registry --config registry.toml --seed state.json
//! ```
//!
//! State lives only in memory. A seed snapshot is read at startup and never
//! written back.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokenize_registry::api::ApiServer;
use tokenize_registry::config::GatewayConfig;
use tokenize_registry::{RegistrySnapshot, TokenizationRegistry};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command line arguments for the registry server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// IP address to bind to, overriding the configuration file
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on, overriding the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON snapshot to load at startup, overriding the configuration file
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => GatewayConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(seed) = &self.seed {
            config.seed_snapshot = Some(seed.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = match &config.seed_snapshot {
        Some(path) => {
            let snapshot = RegistrySnapshot::read_json_file(path)
                .with_context(|| format!("Failed to load seed snapshot {}", path.display()))?;
            info!(
                "Loaded seed snapshot with {} assets and {} wallets",
                snapshot.assets.len(),
                snapshot.wallets.len()
            );
            TokenizationRegistry::from_snapshot(snapshot)
        }
        None => TokenizationRegistry::new(),
    };

    let server = ApiServer::new(Arc::new(registry), config);
    server.start().await?;

    Ok(())
}
