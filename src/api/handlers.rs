// API handlers for the registry gateway
//
// Each handler validates its input, makes one registry call where possible and
// wraps the outcome in the response envelope.

use super::{ApiError, ApiResponse, AppState};
use crate::error::RegistryError;
use crate::id::{AssetId, WalletId};
use crate::objects::{AssetType, ComplianceStatus, DigitalWallet, TokenizedAsset, WalletType};
use crate::snapshot::RegistrySnapshot;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::ok(data))))
}

fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

/// Unwrap a JSON body, turning extractor rejections into 400 envelopes
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn path_params<T>(params: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    params
        .map(|Path(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Body of `POST /assets` and `PUT /assets/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct NewAsset {
    /// Asset ID; ignored on update, where the path ID wins
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    pub value: f64,
    pub owner: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl NewAsset {
    fn validate(&self) -> Result<(), RegistryError> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(RegistryError::InvalidPayload(format!(
                "Asset value must be a non-negative number, got {}",
                self.value
            )));
        }
        Ok(())
    }

    fn into_asset(self, id: AssetId) -> TokenizedAsset {
        TokenizedAsset::new(id, self.name, self.asset_type, self.value, self.owner, self.metadata)
    }
}

/// Body of `POST /wallets`
#[derive(Debug, Clone, Deserialize)]
pub struct NewWallet {
    pub id: String,
    pub owner: String,
    pub wallet_type: WalletType,
}

/// Query parameters of `GET /assets`
#[derive(Debug, Default, Deserialize)]
pub struct AssetFilter {
    /// Restrict the listing to one asset type
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
}

/// ID of the entity a request created or changed
#[derive(Debug, Serialize)]
pub struct IdPayload {
    pub id: String,
}

/// Liveness report with current entity counts
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub assets: usize,
    pub wallets: usize,
}

/// Outcome of a compliance check
#[derive(Debug, Serialize)]
pub struct ComplianceResult {
    pub id: String,
    pub compliance_status: ComplianceStatus,
}

/// Stored balance of a wallet
#[derive(Debug, Serialize)]
pub struct WalletValue {
    pub id: String,
    pub value: f64,
}

/// Wallet and asset affected by a membership change
#[derive(Debug, Serialize)]
pub struct MembershipChange {
    pub wallet_id: String,
    pub asset_id: String,
}

/// Entity counts loaded by a snapshot restore
#[derive(Debug, Serialize)]
pub struct RestoreSummary {
    pub assets: usize,
    pub wallets: usize,
}

fn require_id(id: &str, what: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} ID cannot be empty", what)));
    }
    Ok(())
}

/// Health check handler
pub async fn health_check(State(registry): State<AppState>) -> ApiResult<HealthStatus> {
    ok(HealthStatus {
        status: "ok",
        assets: registry.asset_count(),
        wallets: registry.wallet_count(),
    })
}

/// List assets, optionally filtered by type
pub async fn list_assets(
    State(registry): State<AppState>,
    filter: Result<Query<AssetFilter>, QueryRejection>,
) -> ApiResult<Vec<TokenizedAsset>> {
    let Some(raw) = query_params(filter)?.asset_type else {
        return ok(registry.list_assets());
    };

    // Unknown names match nothing rather than falling back to `other`
    let assets = match AssetType::from_wire(&raw) {
        Some(asset_type) => registry.get_assets_by_type(asset_type),
        None => Vec::new(),
    };
    if assets.is_empty() {
        Ok((
            StatusCode::OK,
            Json(ApiResponse::ok_with_message(
                assets,
                format!("No assets found for type: {}", raw),
            )),
        ))
    } else {
        ok(assets)
    }
}

/// Get asset handler
pub async fn get_asset(
    State(registry): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<TokenizedAsset> {
    let id = path_params(id)?;
    match registry.get_asset(&id) {
        Some(asset) => ok(asset),
        None => Err(ApiError::not_found(format!("Asset {} not found", id))),
    }
}

/// Create asset handler
pub async fn create_asset(
    State(registry): State<AppState>,
    payload: Result<Json<NewAsset>, JsonRejection>,
) -> ApiResult<IdPayload> {
    let request = json_body(payload)?;
    require_id(&request.id, "Asset")?;
    request.validate()?;

    info!("Creating asset {}", request.id);
    let id = AssetId::new(request.id.clone());
    let id = registry.create_asset(request.into_asset(id));

    created(IdPayload { id: id.into_inner() })
}

/// Update asset handler; replaces the stored record wholesale
pub async fn update_asset(
    State(registry): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<NewAsset>, JsonRejection>,
) -> ApiResult<IdPayload> {
    let id = path_params(id)?;
    let request = json_body(payload)?;
    request.validate()?;

    info!("Updating asset {}", id);
    let asset = request.into_asset(AssetId::new(id.clone()));
    if registry.update_asset(&id, asset) {
        ok(IdPayload { id })
    } else {
        Err(ApiError::not_found(format!("Asset {} not found", id)))
    }
}

/// Delete asset handler
pub async fn delete_asset(
    State(registry): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<IdPayload> {
    let id = path_params(id)?;
    info!("Deleting asset {}", id);
    if registry.delete_asset(&id) {
        ok(IdPayload { id })
    } else {
        Err(ApiError::not_found(format!("Asset {} not found", id)))
    }
}

/// Compliance check handler
pub async fn check_compliance(
    State(registry): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<ComplianceResult> {
    let id = path_params(id)?;
    match registry.perform_compliance_check(&id) {
        Some(compliance_status) => {
            info!("Compliance check on asset {}: {}", id, compliance_status);
            ok(ComplianceResult {
                id,
                compliance_status,
            })
        }
        None => Err(ApiError::not_found(format!("Asset {} not found", id))),
    }
}

/// List wallets handler
pub async fn list_wallets(State(registry): State<AppState>) -> ApiResult<Vec<DigitalWallet>> {
    ok(registry.list_wallets())
}

/// Get wallet handler
pub async fn get_wallet(
    State(registry): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<DigitalWallet> {
    let id = path_params(id)?;
    match registry.get_wallet(&id) {
        Some(wallet) => ok(wallet),
        None => Err(ApiError::not_found(format!("Wallet {} not found", id))),
    }
}

/// Create wallet handler
pub async fn create_wallet(
    State(registry): State<AppState>,
    payload: Result<Json<NewWallet>, JsonRejection>,
) -> ApiResult<IdPayload> {
    let request = json_body(payload)?;
    require_id(&request.id, "Wallet")?;

    info!("Creating wallet {}", request.id);
    let wallet = DigitalWallet::new(WalletId::new(request.id), request.owner, request.wallet_type);
    let id = registry.create_wallet(wallet);

    created(IdPayload { id: id.into_inner() })
}

/// Wallet value handler
pub async fn get_wallet_value(
    State(registry): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<WalletValue> {
    let id = path_params(id)?;
    match registry.get_wallet_value(&id) {
        Some(value) => ok(WalletValue { id, value }),
        None => Err(ApiError::not_found(format!("Wallet {} not found", id))),
    }
}

// The registry folds "missing entity" and "refused change" into one `false`.
// Tell them apart afterwards so callers get 404 or 409.
fn membership_failure(registry: &AppState, wallet_id: &str, asset_id: &str, reason: &str) -> ApiError {
    if registry.get_wallet(wallet_id).is_none() {
        ApiError::not_found(format!("Wallet {} not found", wallet_id))
    } else if registry.get_asset(asset_id).is_none() {
        ApiError::not_found(format!("Asset {} not found", asset_id))
    } else {
        ApiError::conflict(format!("Asset {} {} wallet {}", asset_id, reason, wallet_id))
    }
}

/// Add an asset to a wallet
pub async fn add_wallet_asset(
    State(registry): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<MembershipChange> {
    let (wallet_id, asset_id) = path_params(ids)?;
    if registry.add_asset_to_wallet(&wallet_id, &asset_id) {
        info!("Added asset {} to wallet {}", asset_id, wallet_id);
        ok(MembershipChange { wallet_id, asset_id })
    } else {
        debug!("Refused to add asset {} to wallet {}", asset_id, wallet_id);
        Err(membership_failure(&registry, &wallet_id, &asset_id, "is already in"))
    }
}

/// Remove an asset from a wallet
pub async fn remove_wallet_asset(
    State(registry): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<MembershipChange> {
    let (wallet_id, asset_id) = path_params(ids)?;
    if registry.remove_asset_from_wallet(&wallet_id, &asset_id) {
        info!("Removed asset {} from wallet {}", asset_id, wallet_id);
        ok(MembershipChange { wallet_id, asset_id })
    } else {
        debug!("Refused to remove asset {} from wallet {}", asset_id, wallet_id);
        Err(membership_failure(&registry, &wallet_id, &asset_id, "is not in"))
    }
}

/// Export the whole registry
pub async fn export_snapshot(State(registry): State<AppState>) -> ApiResult<RegistrySnapshot> {
    ok(registry.snapshot())
}

/// Replace the whole registry with the posted snapshot
pub async fn restore_snapshot(
    State(registry): State<AppState>,
    payload: Result<Json<RegistrySnapshot>, JsonRejection>,
) -> ApiResult<RestoreSummary> {
    let snapshot = json_body(payload)?;
    let summary = RestoreSummary {
        assets: snapshot.assets.len(),
        wallets: snapshot.wallets.len(),
    };

    info!(
        "Restoring registry from snapshot ({} assets, {} wallets)",
        summary.assets, summary.wallets
    );
    registry.restore(snapshot);
    ok(summary)
}

/// Fallback for requests that match no route
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
