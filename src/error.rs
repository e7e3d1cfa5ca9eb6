use std::io;
use thiserror::Error;

/// Result alias for fallible registry-adjacent operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised around the registry: codecs, configuration, I/O and the gateway.
///
/// Business conditions inside the registry itself (missing entities, duplicate
/// membership) are never errors; they come back as `Option` or `bool`.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// IO errors that occur when reading snapshot or configuration files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced asset or wallet does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request payload was rejected before reaching the registry
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Generic errors that don't fit in other categories
    #[error("Other error: {0}")]
    Other(String),

    /// Anyhow error wrapper for error context
    #[error(transparent)]
    Context(#[from] anyhow::Error),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for RegistryError {
    fn from(err: bincode::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}

#[cfg(feature = "server")]
impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        RegistryError::Config(err.to_string())
    }
}

impl From<String> for RegistryError {
    fn from(err: String) -> Self {
        RegistryError::Other(err)
    }
}

impl From<&str> for RegistryError {
    fn from(err: &str) -> Self {
        RegistryError::Other(err.to_string())
    }
}
