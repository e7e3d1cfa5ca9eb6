use crate::compliance::{AutoApproveEngine, ComplianceEngine};
use crate::id::{AssetId, WalletId};
use crate::objects::{current_time_secs, AssetType, ComplianceStatus, DigitalWallet, TokenizedAsset};
use crate::snapshot::RegistrySnapshot;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;

/// The two entity collections guarded by the registry lock
#[derive(Debug, Default)]
struct RegistryState {
    assets: HashMap<AssetId, TokenizedAsset>,
    wallets: HashMap<WalletId, DigitalWallet>,
}

/// In-memory authoritative store for tokenized assets and digital wallets.
///
/// One lock covers both collections and is held for the whole of every
/// operation, so each call is atomic with respect to every other call. Nothing
/// spans calls: "create asset, then add it to a wallet" is two independent
/// steps and other threads can observe the state in between.
///
/// Missing entities and refused membership changes are ordinary return values
/// (`None` / `false`), never errors.
#[derive(Debug)]
pub struct TokenizationRegistry {
    state: Mutex<RegistryState>,
    compliance: Box<dyn ComplianceEngine>,
}

impl Default for TokenizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizationRegistry {
    /// Create an empty registry using the auto-approving compliance engine
    pub fn new() -> Self {
        Self::with_compliance_engine(AutoApproveEngine)
    }

    /// Create an empty registry that consults the given compliance engine
    pub fn with_compliance_engine<E: ComplianceEngine + 'static>(engine: E) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            compliance: Box::new(engine),
        }
    }

    /// Build a registry from a snapshot record
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let registry = Self::new();
        registry.restore(snapshot);
        registry
    }

    // ---- Assets ----

    /// Store an asset under its ID, replacing any existing asset with that ID
    pub fn create_asset(&self, asset: TokenizedAsset) -> AssetId {
        let mut state = self.state.lock();
        let id = asset.id.clone();
        if state.assets.insert(id.clone(), asset).is_some() {
            debug!("Replaced existing asset {}", id);
        } else {
            debug!("Created asset {}", id);
        }
        id
    }

    /// Get an asset by ID
    pub fn get_asset(&self, asset_id: &str) -> Option<TokenizedAsset> {
        self.state.lock().assets.get(asset_id).cloned()
    }

    /// Replace an existing asset wholesale
    ///
    /// The record is stored under `asset_id` regardless of the ID it carries and
    /// keeps the stored `created_at`; `updated_at` is refreshed.
    /// Wallets holding the asset keep the balance contribution of the old value.
    ///
    /// # Returns
    /// * `true` - The asset existed and was replaced
    /// * `false` - No asset with this ID exists; nothing was stored
    pub fn update_asset(&self, asset_id: &str, mut updated: TokenizedAsset) -> bool {
        let mut state = self.state.lock();
        let Some(existing) = state.assets.get_mut(asset_id) else {
            return false;
        };

        updated.id = existing.id.clone();
        updated.created_at = existing.created_at;
        updated.touch();
        *existing = updated;
        debug!("Updated asset {}", asset_id);
        true
    }

    /// Delete an asset and drop it from every wallet that holds it
    ///
    /// Each affected wallet loses the asset's value from its balance.
    pub fn delete_asset(&self, asset_id: &str) -> bool {
        let mut state = self.state.lock();
        let Some(removed) = state.assets.remove(asset_id) else {
            return false;
        };

        let now = current_time_secs();
        for wallet in state.wallets.values_mut() {
            if let Some(position) = wallet.assets.iter().position(|id| *id == removed.id) {
                wallet.assets.remove(position);
                wallet.balance -= removed.value;
                wallet.updated_at = now;
                debug!("Removed deleted asset {} from wallet {}", asset_id, wallet.id);
            }
        }

        debug!("Deleted asset {}", asset_id);
        true
    }

    /// All assets, sorted by ID
    pub fn list_assets(&self) -> Vec<TokenizedAsset> {
        let state = self.state.lock();
        let mut assets: Vec<_> = state.assets.values().cloned().collect();
        assets.sort_by(|a, b| a.id.cmp(&b.id));
        assets
    }

    /// All assets of the given type, sorted by ID
    pub fn get_assets_by_type(&self, asset_type: AssetType) -> Vec<TokenizedAsset> {
        let state = self.state.lock();
        let mut assets: Vec<_> = state
            .assets
            .values()
            .filter(|asset| asset.asset_type == asset_type)
            .cloned()
            .collect();
        assets.sort_by(|a, b| a.id.cmp(&b.id));
        assets
    }

    /// Run the compliance engine on an asset and record the outcome
    ///
    /// # Returns
    /// * `Some(status)` - The asset's new compliance status
    /// * `None` - No asset with this ID exists
    pub fn perform_compliance_check(&self, asset_id: &str) -> Option<ComplianceStatus> {
        let mut state = self.state.lock();
        let asset = state.assets.get_mut(asset_id)?;

        let status = self.compliance.evaluate(asset);
        asset.compliance_status = status;
        asset.touch();
        debug!("Compliance check on asset {}: {}", asset_id, status);
        Some(status)
    }

    /// Number of assets in the registry
    pub fn asset_count(&self) -> usize {
        self.state.lock().assets.len()
    }

    // ---- Wallets ----

    /// Store a wallet under its ID, replacing any existing wallet with that ID
    pub fn create_wallet(&self, wallet: DigitalWallet) -> WalletId {
        let mut state = self.state.lock();
        let id = wallet.id.clone();
        if state.wallets.insert(id.clone(), wallet).is_some() {
            debug!("Replaced existing wallet {}", id);
        } else {
            debug!("Created wallet {}", id);
        }
        id
    }

    /// Get a wallet by ID
    pub fn get_wallet(&self, wallet_id: &str) -> Option<DigitalWallet> {
        self.state.lock().wallets.get(wallet_id).cloned()
    }

    /// All wallets, sorted by ID
    pub fn list_wallets(&self) -> Vec<DigitalWallet> {
        let state = self.state.lock();
        let mut wallets: Vec<_> = state.wallets.values().cloned().collect();
        wallets.sort_by(|a, b| a.id.cmp(&b.id));
        wallets
    }

    /// Add an asset to a wallet and credit its current value to the balance
    ///
    /// # Returns
    /// * `true` - The asset was added
    /// * `false` - The wallet or asset does not exist, or the asset is already a member
    pub fn add_asset_to_wallet(&self, wallet_id: &str, asset_id: &str) -> bool {
        let mut state = self.state.lock();
        let RegistryState { assets, wallets } = &mut *state;

        let (Some(wallet), Some(asset)) = (wallets.get_mut(wallet_id), assets.get(asset_id)) else {
            return false;
        };
        if wallet.contains(asset_id) {
            return false;
        }

        wallet.assets.push(asset.id.clone());
        wallet.balance += asset.value;
        wallet.touch();
        debug!("Added asset {} to wallet {}", asset_id, wallet_id);
        true
    }

    /// Remove an asset from a wallet and debit its current value from the balance
    ///
    /// # Returns
    /// * `true` - The asset was removed
    /// * `false` - The wallet or asset does not exist, or the asset is not a member
    pub fn remove_asset_from_wallet(&self, wallet_id: &str, asset_id: &str) -> bool {
        let mut state = self.state.lock();
        let RegistryState { assets, wallets } = &mut *state;

        let (Some(wallet), Some(asset)) = (wallets.get_mut(wallet_id), assets.get(asset_id)) else {
            return false;
        };
        let Some(position) = wallet.assets.iter().position(|id| id.as_str() == asset_id) else {
            return false;
        };

        wallet.assets.remove(position);
        wallet.balance -= asset.value;
        wallet.touch();
        debug!("Removed asset {} from wallet {}", asset_id, wallet_id);
        true
    }

    /// Get the stored balance of a wallet
    pub fn get_wallet_value(&self, wallet_id: &str) -> Option<f64> {
        self.state.lock().wallets.get(wallet_id).map(|wallet| wallet.balance)
    }

    /// Number of wallets in the registry
    pub fn wallet_count(&self) -> usize {
        self.state.lock().wallets.len()
    }

    // ---- Snapshots ----

    /// Copy the whole registry into a snapshot record
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.lock();
        RegistrySnapshot {
            assets: state
                .assets
                .iter()
                .map(|(id, asset)| (id.clone(), asset.clone()))
                .collect(),
            wallets: state
                .wallets
                .iter()
                .map(|(id, wallet)| (id.clone(), wallet.clone()))
                .collect(),
        }
    }

    /// Replace the registry contents with a snapshot record
    ///
    /// Balances and memberships are taken as recorded; nothing is recomputed.
    pub fn restore(&self, mut snapshot: RegistrySnapshot) {
        snapshot.normalize_ids();
        let mut state = self.state.lock();
        state.assets = snapshot.assets.into_iter().collect();
        state.wallets = snapshot.wallets.into_iter().collect();
        debug!(
            "Restored registry with {} assets and {} wallets",
            state.assets.len(),
            state.wallets.len()
        );
    }
}
