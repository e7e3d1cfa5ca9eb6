// HTTP gateway for the tokenization registry
//
// Translates JSON requests into registry calls and wraps every result in the
// `{success, data, message}` envelope.

use crate::config::GatewayConfig;
use crate::error::{RegistryError, Result};
use crate::registry::TokenizationRegistry;
use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod handlers;

pub use handlers::{AssetFilter, NewAsset, NewWallet};

/// Shared state handed to every handler
pub type AppState = Arc<TokenizationRegistry>;

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload, absent on failure
    pub data: Option<T>,
    /// Optional human-readable note
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful response carrying a payload and a note
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// API error, rendered as a failed envelope
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status to respond with
    pub status: StatusCode,
    /// Error message placed in the envelope
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            message: Some(self.message),
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert RegistryError to an API error
impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match err {
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::InvalidPayload(_) | RegistryError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Build the gateway router for a registry
///
/// All API routes are mounted under `config.api_prefix`; `/` or an empty
/// prefix mounts them at the root. Unmatched paths get a 404 envelope.
pub fn create_router(registry: AppState, config: &GatewayConfig) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/assets", get(handlers::list_assets).post(handlers::create_asset))
        .route(
            "/assets/:id",
            get(handlers::get_asset)
                .put(handlers::update_asset)
                .delete(handlers::delete_asset),
        )
        .route("/assets/:id/compliance", post(handlers::check_compliance))
        .route("/wallets", get(handlers::list_wallets).post(handlers::create_wallet))
        .route("/wallets/:id", get(handlers::get_wallet))
        .route("/wallets/:id/value", get(handlers::get_wallet_value))
        .route(
            "/wallets/:id/assets/:asset_id",
            post(handlers::add_wallet_asset).delete(handlers::remove_wallet_asset),
        )
        .route(
            "/snapshot",
            get(handlers::export_snapshot).put(handlers::restore_snapshot),
        )
        .with_state(registry);

    let prefix = config.api_prefix.trim_end_matches('/');
    let mut app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };
    app = app.fallback(handlers::route_not_found);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

/// API Server
pub struct ApiServer {
    registry: AppState,
    config: GatewayConfig,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(registry: AppState, config: GatewayConfig) -> Self {
        Self { registry, config }
    }

    /// Bind the configured address and serve until the process is stopped
    pub async fn start(&self) -> Result<()> {
        let addr = self.config.socket_addr()?;
        let app = create_router(self.registry.clone(), &self.config);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            "Registry API listening on http://{}{}",
            addr, self.config.api_prefix
        );

        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> (AppState, Router) {
        let registry = Arc::new(TokenizationRegistry::new());
        let app = create_router(registry.clone(), &GatewayConfig::default());
        (registry, app)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn sample_asset() -> Value {
        json!({
            "id": "asset_001",
            "name": "Tech Company Equity Shares",
            "asset_type": "equity",
            "value": 50000.0,
            "owner": "user_001",
            "metadata": {"issuer": "Example Corp", "country": "USA"}
        })
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let (_, app) = test_app();
        let (status, body) = send(&app, "GET", "/api/core/assets", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["message"], Value::Null);
    }

    #[tokio::test]
    async fn test_create_and_get_asset() {
        let (registry, app) = test_app();

        let (status, body) = send(&app, "POST", "/api/core/assets", Some(sample_asset())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], "asset_001");
        assert!(registry.get_asset("asset_001").is_some());

        let (status, body) = send(&app, "GET", "/api/core/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["asset_type"], "equity");
        assert_eq!(body["data"]["compliance_status"], "pending");
        assert_eq!(body["data"]["metadata"]["issuer"], "Example Corp");
    }

    #[tokio::test]
    async fn test_unknown_asset_type_coerces() {
        let (registry, app) = test_app();
        let mut asset = sample_asset();
        asset["asset_type"] = json!("not_a_real_type");

        let (status, _) = send(&app, "POST", "/api/core/assets", Some(asset)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            registry.get_asset("asset_001").unwrap().asset_type,
            crate::objects::AssetType::Other
        );
    }

    #[tokio::test]
    async fn test_malformed_asset_payloads() {
        let (registry, app) = test_app();

        let mut missing_name = sample_asset();
        missing_name.as_object_mut().unwrap().remove("name");
        let (status, body) = send(&app, "POST", "/api/core/assets", Some(missing_name)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], Value::Null);

        let mut non_numeric = sample_asset();
        non_numeric["value"] = json!("lots");
        let (status, _) = send(&app, "POST", "/api/core/assets", Some(non_numeric)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut negative = sample_asset();
        negative["value"] = json!(-1.0);
        let (status, _) = send(&app, "POST", "/api/core/assets", Some(negative)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut empty_id = sample_asset();
        empty_id["id"] = json!("");
        let (status, _) = send(&app, "POST", "/api/core/assets", Some(empty_id)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(registry.asset_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_entities() {
        let (_, app) = test_app();

        let (status, body) = send(&app, "GET", "/api/core/assets/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("nope"));

        let (status, _) = send(&app, "GET", "/api/core/wallets/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/api/core/assets/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "POST", "/api/core/assets/nope/compliance", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/core/wallets/nope/value", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wallet_flow() {
        let (registry, app) = test_app();
        send(&app, "POST", "/api/core/assets", Some(sample_asset())).await;

        let wallet = json!({"id": "wallet_001", "owner": "user_001", "wallet_type": "custodial"});
        let (status, body) = send(&app, "POST", "/api/core/wallets", Some(wallet)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], "wallet_001");

        let (status, _) = send(&app, "POST", "/api/core/wallets/wallet_001/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::OK);

        // Second add is refused
        let (status, body) = send(&app, "POST", "/api/core/wallets/wallet_001/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, body) = send(&app, "GET", "/api/core/wallets/wallet_001/value", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["value"], 50000.0);

        let (status, body) = send(&app, "GET", "/api/core/wallets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["assets"], json!(["asset_001"]));

        let (status, _) = send(&app, "DELETE", "/api/core/wallets/wallet_001/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", "/api/core/wallets/wallet_001/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, "POST", "/api/core/wallets/wallet_001/assets/asset_404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(registry.get_wallet_value("wallet_001"), Some(0.0));
    }

    #[tokio::test]
    async fn test_unknown_wallet_type_coerces() {
        let (registry, app) = test_app();
        let wallet = json!({"id": "wallet_001", "owner": "user_001", "wallet_type": "paper"});
        let (status, _) = send(&app, "POST", "/api/core/wallets", Some(wallet)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            registry.get_wallet("wallet_001").unwrap().wallet_type,
            crate::objects::WalletType::Custodial
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_through_api() {
        let (registry, app) = test_app();
        send(&app, "POST", "/api/core/assets", Some(sample_asset())).await;
        let wallet = json!({"id": "wallet_001", "owner": "user_001", "wallet_type": "hybrid"});
        send(&app, "POST", "/api/core/wallets", Some(wallet)).await;
        send(&app, "POST", "/api/core/wallets/wallet_001/assets/asset_001", None).await;

        let (status, body) = send(&app, "DELETE", "/api/core/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], "asset_001");

        let wallet = registry.get_wallet("wallet_001").unwrap();
        assert!(wallet.assets.is_empty());
        assert_eq!(wallet.balance, 0.0);
    }

    #[tokio::test]
    async fn test_update_and_compliance() {
        let (registry, app) = test_app();
        send(&app, "POST", "/api/core/assets", Some(sample_asset())).await;

        let mut update = sample_asset();
        update["value"] = json!(75000.0);
        let (status, _) = send(&app, "PUT", "/api/core/assets/asset_001", Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(registry.get_asset("asset_001").unwrap().value, 75000.0);

        let (status, _) = send(&app, "PUT", "/api/core/assets/asset_404", Some(sample_asset())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(registry.get_asset("asset_404").is_none());

        let (status, body) = send(&app, "POST", "/api/core/assets/asset_001/compliance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["compliance_status"], "approved");
    }

    #[tokio::test]
    async fn test_filter_by_type() {
        let (_, app) = test_app();
        send(&app, "POST", "/api/core/assets", Some(sample_asset())).await;
        let mut art = sample_asset();
        art["id"] = json!("asset_002");
        art["asset_type"] = json!("art");
        send(&app, "POST", "/api/core/assets", Some(art)).await;

        let (status, body) = send(&app, "GET", "/api/core/assets?type=art", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], "asset_002");

        let (_, body) = send(&app, "GET", "/api/core/assets?type=fund", None).await;
        assert_eq!(body["data"], json!([]));
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_filter_by_unknown_type_matches_nothing() {
        let (_, app) = test_app();
        let mut other = sample_asset();
        other["asset_type"] = json!("other");
        send(&app, "POST", "/api/core/assets", Some(other)).await;

        let (status, body) = send(&app, "GET", "/api/core/assets?type=other", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/api/core/assets?type=not_a_real_type", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([]));
        assert!(body["message"].as_str().unwrap().contains("not_a_real_type"));
    }

    #[tokio::test]
    async fn test_bad_query_uses_envelope() {
        let (_, app) = test_app();
        let (status, body) = send(&app, "GET", "/api/core/assets?type=art&type=fund", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], Value::Null);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_bad_path_uses_envelope() {
        let (_, app) = test_app();
        // Not valid UTF-8 once decoded
        let (status, body) = send(&app, "GET", "/api/core/assets/%FF", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_unmatched_route_uses_envelope() {
        let (_, app) = test_app();

        let (status, body) = send(&app, "GET", "/api/core/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("nope"));

        let (status, body) = send(&app, "GET", "/elsewhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_snapshot_export_and_restore() {
        let (_, app) = test_app();
        send(&app, "POST", "/api/core/assets", Some(sample_asset())).await;
        let (status, exported) = send(&app, "GET", "/api/core/snapshot", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exported["data"]["assets"]["asset_001"]["value"], 50000.0);

        let (_, other) = test_app();
        let (status, body) = send(&other, "PUT", "/api/core/snapshot", Some(exported["data"].clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["assets"], 1);
        assert_eq!(body["data"]["wallets"], 0);

        let (status, _) = send(&other, "GET", "/api/core/assets/asset_001", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_and_cors() {
        let (_, app) = test_app();
        let request = Request::builder()
            .method("GET")
            .uri("/api/core/health")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_root_prefix() {
        let registry = Arc::new(TokenizationRegistry::new());
        let config = GatewayConfig {
            api_prefix: "/".to_string(),
            ..GatewayConfig::default()
        };
        let app = create_router(registry, &config);

        let (status, body) = send(&app, "GET", "/assets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
