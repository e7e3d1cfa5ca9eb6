use crate::error::Result;
use crate::id::{AssetId, WalletId};
use crate::objects::{DigitalWallet, TokenizedAsset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Whole-registry record used for snapshot/restore and transport.
///
/// Shape: `{"assets": {id: asset}, "wallets": {id: wallet}}`. Keys are kept
/// sorted so encodings are deterministic. The map key is authoritative for each
/// record's ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// All assets, keyed by ID
    #[serde(default)]
    pub assets: BTreeMap<AssetId, TokenizedAsset>,

    /// All wallets, keyed by ID
    #[serde(default)]
    pub wallets: BTreeMap<WalletId, DigitalWallet>,
}

impl RegistrySnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite every record's `id` to match the key it is stored under
    pub fn normalize_ids(&mut self) {
        for (id, asset) in self.assets.iter_mut() {
            if asset.id != *id {
                asset.id = id.clone();
            }
        }
        for (id, wallet) in self.wallets.iter_mut() {
            if wallet.id != *id {
                wallet.id = id.clone();
            }
        }
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        snapshot.normalize_ids();
        Ok(snapshot)
    }

    /// Encode in the compact binary form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from the compact binary form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut snapshot: Self = bincode::deserialize(bytes)?;
        snapshot.normalize_ids();
        Ok(snapshot)
    }

    /// Read a JSON snapshot from a file
    pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
