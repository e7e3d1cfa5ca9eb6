pub mod compliance;
pub mod error;
pub mod id;
pub mod objects;
pub mod registry;
pub mod snapshot;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;

// Re-export the main types for convenience
pub use compliance::{AutoApproveEngine, ComplianceEngine};
pub use error::{RegistryError, Result};
pub use id::{AssetId, WalletId};
pub use objects::{AssetType, ComplianceStatus, DigitalWallet, TokenizedAsset, WalletType};
pub use registry::TokenizationRegistry;
pub use snapshot::RegistrySnapshot;
