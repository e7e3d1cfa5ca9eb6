// Configuration for the registry gateway
//
// Loaded from an optional TOML file; every field has a default so an empty file
// (or no file at all) yields a working configuration.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// IP address to bind the API server to
    pub bind_address: String,
    /// Port number for the API server
    pub port: u16,
    /// Path prefix every API route is mounted under
    pub api_prefix: String,
    /// Whether to send permissive CORS headers
    pub enable_cors: bool,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// JSON snapshot restored into the registry at startup
    pub seed_snapshot: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3032,
            api_prefix: "/api/core".to_string(),
            enable_cors: true,
            log_level: "info".to_string(),
            seed_snapshot: None,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RegistryError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: GatewayConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be served
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(RegistryError::Config(format!(
                "API prefix must start with '/': {}",
                self.api_prefix
            )));
        }
        Ok(())
    }

    /// The address the server listens on
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| RegistryError::Config(format!("Invalid bind address: {}", e)))
    }
}
