// src/services/api_server.rs
//! API Server for the Base Verify demo
//!
//! REST interface in front of the verification flow. The browser builds and
//! signs a message; this server checks that the message embeds exactly the
//! configured provider, action and trait requirements, forwards it to Base
//! Verify with the secret key, and records an airdrop claim on success.
//!
//! Endpoints:
//! - `POST /api/build-message`: message to sign for an address
//! - `POST /api/verify-token`: verify a signed message and record the claim
//! - `GET  /api/users`: airdrop claims, newest first
//! - `GET  /api/coinbase/users`: claims verified through Coinbase, newest first
//! - `POST /api/delete-airdrop`: remove a claim, authorized by signature

use crate::message::builder::{MessageBuilder, MessageOptions};
use crate::message::resources::{extract_resources, find_action};
use crate::models::auth_message::AuthMessage;
use crate::models::trait_requirement::TraitRequirements;
use crate::models::verification::VerificationOutcome;
use crate::models::verified_user::ClaimSummary;
use crate::services::trait_validator::validate_traits;
use crate::services::verifier::{ClientError, VerificationBackend};
use crate::settings::Settings;
use crate::storage::airdrop_store::{AirdropStore, InMemoryAirdropStore};
use crate::utils::crypto::{parse_address, verify_personal_signature};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

const DELETE_MESSAGE_PREFIX: &str = "Delete airdrop for ";
const COINBASE_PROVIDER: &str = "coinbase";

// API request structures

/// Signed message submitted for verification or deletion.
#[derive(Deserialize)]
struct SignedMessageRequest {
    signature: Option<String>,
    message: Option<String>,
}

impl SignedMessageRequest {
    fn into_parts(self) -> Option<(String, String)> {
        match (self.signature, self.message) {
            (Some(signature), Some(message)) if !signature.is_empty() && !message.is_empty() => {
                Some((signature, message))
            }
            _ => None,
        }
    }
}

/// Request payload for building a message. Unset fields use the configured
/// expectations.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildMessageRequest {
    address: Option<String>,
    action: Option<String>,
    provider: Option<String>,
    traits: Option<TraitRequirements>,
    verification_id: Option<String>,
}

fn error_body(error: &str) -> Json<Value> {
    Json(json!({ "error": error }))
}

/// API server state containing all service dependencies
#[derive(Clone)]
pub struct ApiServer {
    /// Expected provider, action and traits, and the mini app URL
    settings: Arc<Settings>,

    /// Builder scoped to this application's domain
    builder: Arc<MessageBuilder>,

    /// Base Verify client
    verifier: Arc<dyn VerificationBackend>,

    /// Airdrop claim registry
    store: Arc<dyn AirdropStore>,

    /// Registry of claims verified through Coinbase
    coinbase_store: Arc<dyn AirdropStore>,
}

impl ApiServer {
    /// Creates a new instance of the API server
    pub fn new(
        settings: Settings,
        verifier: Arc<dyn VerificationBackend>,
        store: Arc<dyn AirdropStore>,
    ) -> Self {
        ApiServer {
            builder: Arc::new(MessageBuilder::from_settings(&settings)),
            settings: Arc::new(settings),
            verifier,
            store,
            coinbase_store: Arc::new(InMemoryAirdropStore::new()),
        }
    }

    /// Replaces the registry that Coinbase-verified claims are recorded in
    pub fn with_coinbase_store(mut self, coinbase_store: Arc<dyn AirdropStore>) -> Self {
        self.coinbase_store = coinbase_store;
        self
    }

    /// Registry that claims verified through `provider` belong to
    fn registry(&self, provider: &str) -> &Arc<dyn AirdropStore> {
        if provider == COINBASE_PROVIDER {
            &self.coinbase_store
        } else {
            &self.store
        }
    }

    /// Routes with state attached
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/build-message", post(Self::build_message_handler))
            .route("/api/verify-token", post(Self::verify_token_handler))
            .route("/api/users", get(Self::users_handler))
            .route("/api/coinbase/users", get(Self::coinbase_users_handler))
            .route("/api/delete-airdrop", post(Self::delete_airdrop_handler))
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("API server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).await
    }

    // =====================
    // Message Handlers
    // =====================

    /// Builds a message for the caller to sign
    ///
    /// # Endpoint
    /// POST /api/build-message
    ///
    /// # Responses
    /// - 200 OK: `{ message, nonce }`
    /// - 400 Bad Request: Missing or malformed address, or a value that
    ///   cannot be written into the message
    async fn build_message_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<BuildMessageRequest>,
    ) -> impl IntoResponse {
        let Some(address) = payload.address.filter(|a| !a.is_empty()) else {
            return (StatusCode::BAD_REQUEST, error_body("Missing required parameter: address"));
        };
        if parse_address(&address).is_err() {
            return (StatusCode::BAD_REQUEST, error_body("Invalid wallet address"));
        }

        let settings = &state.settings;
        let mut options = MessageOptions::new(address)
            .action(payload.action.unwrap_or_else(|| settings.expected_action.clone()))
            .provider(payload.provider.unwrap_or_else(|| settings.expected_provider.clone()))
            .traits(payload.traits.unwrap_or_else(|| settings.expected_traits.clone()));
        options.verification_id = payload.verification_id;

        match state.builder.build(&options) {
            Ok(built) => (
                StatusCode::OK,
                Json(json!({ "message": built.message, "nonce": built.nonce })),
            ),
            Err(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid message parameters", "details": e.to_string() })),
            ),
        }
    }

    // =====================
    // Verification Handlers
    // =====================

    /// Verifies a signed message with Base Verify and records the claim
    ///
    /// # Endpoint
    /// POST /api/verify-token
    ///
    /// # Process Flow
    /// 1. Parses the message to recover the claiming address
    /// 2. Checks the declared action and trait requirements against configuration
    /// 3. Forwards message and signature to Base Verify
    /// 4. Records the claim in the provider's registry when a token is issued
    ///
    /// # Responses
    /// - 200 OK: Verified, claim recorded
    /// - 400 Bad Request: Missing parameters or unreadable message
    /// - 404 Not Found: No verification with the provider yet
    /// - 412 Precondition Failed: Verification does not meet the traits
    /// - 422 Unprocessable Entity: Message embeds the wrong requirements
    /// - 5xx: Base Verify unreachable or misconfigured
    async fn verify_token_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<SignedMessageRequest>,
    ) -> impl IntoResponse {
        let Some((signature, message)) = payload.into_parts() else {
            return (
                StatusCode::BAD_REQUEST,
                error_body("Missing required parameters: signature and message"),
            );
        };

        let parsed = match message.parse::<AuthMessage>() {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Rejected unreadable message: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid SIWE message", "details": e.to_string() })),
                );
            }
        };

        let settings = &state.settings;
        let resources = extract_resources(&message).unwrap_or_default();
        let action = find_action(&resources);
        if action != Some(settings.expected_action.as_str()) {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "Invalid action",
                    "details": format!(
                        "Action mismatch: expected '{}', found '{}'",
                        settings.expected_action,
                        action.unwrap_or_default()
                    ),
                })),
            );
        }

        let validation = validate_traits(&message, &settings.expected_provider, &settings.expected_traits);
        if !validation.valid {
            log::warn!(
                "Trait validation failed for {}: {}",
                parsed.address(),
                validation.error.as_deref().unwrap_or_default()
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "Invalid trait requirements",
                    "details": validation.error.clone(),
                    "validation": validation,
                })),
            );
        }

        let outcome = match state.verifier.verify_token(&message, &signature).await {
            Ok(outcome) => outcome,
            Err(ClientError::MissingSecretKey) => {
                log::error!("Base Verify secret key is not configured");
                return (StatusCode::INTERNAL_SERVER_ERROR, error_body("Internal server error"));
            }
            Err(e) => {
                log::error!("Error in verify-token route: {}", e);
                return (
                    StatusCode::BAD_GATEWAY,
                    error_body("Failed to verify signature with base-verify-api"),
                );
            }
        };

        match outcome {
            VerificationOutcome::Verified { token, payload } => {
                let user = state
                    .registry(&settings.expected_provider)
                    .record(&parsed.address(), token);
                log::info!("Recorded airdrop claim #{} for {}", user.id, user.address);
                (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "verification": payload,
                        "message": "Signature verified",
                    })),
                )
            }
            VerificationOutcome::NotFound { message } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Verification not found",
                    "details": message,
                    "miniAppUrl": settings.mini_app_url,
                })),
            ),
            VerificationOutcome::PreconditionFailed { message } => (
                StatusCode::PRECONDITION_FAILED,
                Json(json!({
                    "error": "Verification does not meet the trait requirements",
                    "details": message,
                })),
            ),
            VerificationOutcome::Failed { status, message } => {
                log::error!("Base verify API error: {} {:?}", status, message);
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    error_body("Failed to verify signature with base-verify-api"),
                )
            }
        }
    }

    // =====================
    // Airdrop Handlers
    // =====================

    /// Lists airdrop claims, newest first
    ///
    /// # Endpoint
    /// GET /api/users
    async fn users_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store, max-age=0")],
            Json(state.store.list()),
        )
    }

    /// Lists Coinbase-verified claims, newest first, without tokens
    ///
    /// # Endpoint
    /// GET /api/coinbase/users
    async fn coinbase_users_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        let claims: Vec<ClaimSummary> = state
            .coinbase_store
            .list()
            .into_iter()
            .map(ClaimSummary::from)
            .collect();
        (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store, max-age=0")],
            Json(claims),
        )
    }

    /// Deletes the caller's airdrop claim
    ///
    /// # Endpoint
    /// POST /api/delete-airdrop
    ///
    /// # Request Body
    /// `message` must read exactly `Delete airdrop for 0x<40 hex>` and
    /// `signature` must be that address's personal signature over it.
    ///
    /// # Security Notes
    /// - The signer is recovered from an EIP-191 personal signature, so only
    ///   externally owned accounts can delete. Contract wallets that sign via
    ///   EIP-1271 are not supported.
    ///
    /// # Responses
    /// - 200 OK: Claim deleted
    /// - 400 Bad Request: Missing parameters, bad message format or bad signature
    /// - 404 Not Found: No claim for the address
    async fn delete_airdrop_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<SignedMessageRequest>,
    ) -> impl IntoResponse {
        let Some((signature, message)) = payload.into_parts() else {
            return (
                StatusCode::BAD_REQUEST,
                error_body("Missing required parameters: signature and message"),
            );
        };

        let Some(address) = delete_target(&message) else {
            return (
                StatusCode::BAD_REQUEST,
                error_body("Invalid message format. Expected: \"Delete airdrop for <wallet address>\""),
            );
        };

        match verify_personal_signature(&message, &signature, address) {
            Ok(true) => {}
            Ok(false) => return (StatusCode::BAD_REQUEST, error_body("Invalid signature")),
            Err(e) => {
                log::warn!("Error verifying signature: {}", e);
                return (StatusCode::BAD_REQUEST, error_body("Invalid signature"));
            }
        }

        if !state.store.delete(address) {
            return (StatusCode::NOT_FOUND, error_body("User not found in airdrop list"));
        }

        log::info!("Successfully deleted user: {}", address);
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Airdrop deleted successfully",
                "address": address,
            })),
        )
    }
}

/// Address named by a deletion request, if `message` has the exact form.
fn delete_target(message: &str) -> Option<&str> {
    let address = message.strip_prefix(DELETE_MESSAGE_PREFIX)?;
    let hex = address.strip_prefix("0x")?;
    (hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())).then_some(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::airdrop_store::InMemoryAirdropStore;
    use crate::wallet::key_management::{KeyManager, MessageSigner};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    /// Backend answering every request with the same outcome.
    struct FixedBackend(VerificationOutcome);

    #[async_trait]
    impl VerificationBackend for FixedBackend {
        async fn verify_token(&self, _: &str, _: &str) -> Result<VerificationOutcome, ClientError> {
            Ok(self.0.clone())
        }
    }

    fn verified() -> VerificationOutcome {
        VerificationOutcome::Verified {
            token: Some("tok_1".to_string()),
            payload: json!({ "token": "tok_1" }),
        }
    }

    fn test_server(outcome: VerificationOutcome) -> (ApiServer, Arc<InMemoryAirdropStore>) {
        let store = Arc::new(InMemoryAirdropStore::new());
        let server = ApiServer::new(Settings::default(), Arc::new(FixedBackend(outcome)), store.clone());
        (server, store)
    }

    async fn call(server: &ApiServer, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn signed_request(server: &ApiServer, traits: &[(&str, &str)]) -> Value {
        signed_request_for(server, "x", traits).await
    }

    async fn signed_request_for(server: &ApiServer, provider: &str, traits: &[(&str, &str)]) -> Value {
        let options = MessageOptions::new(DEV_ADDRESS)
            .action("base_verify_token")
            .provider(provider)
            .traits(traits.iter().copied().collect());
        let message = server.builder.build(&options).unwrap().message;
        let signature = KeyManager::from_private_key(DEV_KEY)
            .unwrap()
            .sign_message(&message)
            .await
            .unwrap();
        json!({ "signature": signature, "message": message })
    }

    #[tokio::test]
    async fn test_build_message_uses_configured_expectations() {
        let (server, _) = test_server(verified());
        let (status, body) = call(&server, "POST", "/api/build-message", json!({ "address": DEV_ADDRESS })).await;

        assert_eq!(status, StatusCode::OK);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("- urn:verify:provider:x\n- urn:verify:provider:x:followers:gt:100"));
        assert!(message.contains("- urn:verify:action:base_verify_token"));
        assert!(message.contains(&format!("Nonce: {}", body["nonce"].as_str().unwrap())));
    }

    #[tokio::test]
    async fn test_build_message_requires_valid_address() {
        let (server, _) = test_server(verified());
        let (status, _) = call(&server, "POST", "/api/build-message", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&server, "POST", "/api/build-message", json!({ "address": "0x123" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid wallet address");
    }

    #[tokio::test]
    async fn test_verify_token_records_claim() {
        let (server, store) = test_server(verified());
        let request = signed_request(&server, &[("followers", "gt:100")]).await;
        let (status, body) = call(&server, "POST", "/api/verify-token", request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["verification"]["token"], "tok_1");

        let claim = store.find(DEV_ADDRESS).unwrap();
        assert_eq!(claim.token.as_deref(), Some("tok_1"));
    }

    #[tokio::test]
    async fn test_verify_token_missing_parameters() {
        let (server, _) = test_server(verified());
        let (status, body) = call(&server, "POST", "/api/verify-token", json!({ "message": "hi" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required parameters: signature and message");
    }

    #[tokio::test]
    async fn test_verify_token_rejects_tampered_traits() {
        let (server, store) = test_server(verified());
        let request = signed_request(&server, &[("followers", "gt:1")]).await;
        let (status, body) = call(&server, "POST", "/api/verify-token", request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["details"],
            "Trait value mismatch: followers (expected: gt:100, found: gt:1)"
        );
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_verify_token_rejects_wrong_action() {
        let (server, _) = test_server(verified());
        let options = MessageOptions::new(DEV_ADDRESS)
            .action("verify_token")
            .provider("x")
            .traits([("followers", "gt:100")].into_iter().collect());
        let message = server.builder.build(&options).unwrap().message;
        let (status, body) = call(
            &server,
            "POST",
            "/api/verify-token",
            json!({ "signature": "0xsig", "message": message }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Invalid action");
    }

    #[tokio::test]
    async fn test_verify_token_maps_backend_outcomes() {
        let (server, store) = test_server(VerificationOutcome::NotFound { message: None });
        let request = signed_request(&server, &[("followers", "gt:100")]).await;
        let (status, body) = call(&server, "POST", "/api/verify-token", request.clone()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["miniAppUrl"], "https://verify.base.dev");
        assert_eq!(store.count(), 0);

        let (server, _) = test_server(VerificationOutcome::PreconditionFailed { message: None });
        let (status, _) = call(&server, "POST", "/api/verify-token", request.clone()).await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);

        let (server, _) = test_server(VerificationOutcome::Failed { status: 503, message: None });
        let (status, _) = call(&server, "POST", "/api/verify-token", request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_users_lists_claims_without_caching() {
        let (server, store) = test_server(verified());
        store.record(DEV_ADDRESS, Some("tok_1".to_string()));

        let request = Request::builder().uri("/api/users").body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store, max-age=0");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let users: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(users[0]["address"], DEV_ADDRESS.to_lowercase());
    }

    #[tokio::test]
    async fn test_build_message_rejects_unrepresentable_traits() {
        let (server, _) = test_server(verified());
        let (status, body) = call(
            &server,
            "POST",
            "/api/build-message",
            json!({ "address": DEV_ADDRESS, "traits": { "country": "in:US, CA" } }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid message parameters");
    }

    #[tokio::test]
    async fn test_verify_token_rejects_appended_provider() {
        let (server, store) = test_server(verified());
        let mut request = signed_request(&server, &[("followers", "gt:100")]).await;
        let tampered = format!("{}\n- urn:verify:provider:coinbase", request["message"].as_str().unwrap());
        request["message"] = Value::String(tampered);

        let (status, body) = call(&server, "POST", "/api/verify-token", request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"], "Multiple providers found in SIWE message: x, coinbase");
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_coinbase_claims_use_their_own_registry() {
        let settings = Settings {
            expected_provider: "coinbase".to_string(),
            ..Settings::default()
        };
        let store = Arc::new(InMemoryAirdropStore::new());
        let coinbase_store = Arc::new(InMemoryAirdropStore::new());
        let server = ApiServer::new(settings, Arc::new(FixedBackend(verified())), store.clone())
            .with_coinbase_store(coinbase_store.clone());

        let request = signed_request_for(&server, "coinbase", &[("followers", "gt:100")]).await;
        let (status, _) = call(&server, "POST", "/api/verify-token", request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.count(), 0);
        assert_eq!(coinbase_store.count(), 1);

        let request = Request::builder().uri("/api/coinbase/users").body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store, max-age=0");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let users: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(users[0]["id"], 1);
        assert_eq!(users[0]["address"], DEV_ADDRESS.to_lowercase());
        assert!(users[0]["createdAt"].is_string());
        assert!(users[0]["updatedAt"].is_string());
        assert!(users[0].get("token").is_none());
    }

    #[tokio::test]
    async fn test_delete_airdrop() {
        let (server, store) = test_server(verified());
        store.record(DEV_ADDRESS, None);

        let message = format!("Delete airdrop for {}", DEV_ADDRESS);
        let signature = KeyManager::from_private_key(DEV_KEY)
            .unwrap()
            .sign_message(&message)
            .await
            .unwrap();
        let request = json!({ "signature": signature, "message": message });

        let (status, body) = call(&server, "POST", "/api/delete-airdrop", request.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], DEV_ADDRESS);
        assert!(store.find(DEV_ADDRESS).is_none());

        let (status, _) = call(&server, "POST", "/api/delete-airdrop", request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_airdrop_requires_owner_signature() {
        let (server, store) = test_server(verified());
        store.record(DEV_ADDRESS, None);

        let message = format!("Delete airdrop for {}", DEV_ADDRESS);
        let signature = KeyManager::new().sign_message(&message).await.unwrap();
        let (status, body) = call(
            &server,
            "POST",
            "/api/delete-airdrop",
            json!({ "signature": signature, "message": message }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid signature");
        assert!(store.find(DEV_ADDRESS).is_some());
    }

    #[test]
    fn test_delete_target() {
        assert_eq!(delete_target(&format!("Delete airdrop for {}", DEV_ADDRESS)), Some(DEV_ADDRESS));
        assert_eq!(delete_target(&format!("Delete airdrop for {} ", DEV_ADDRESS)), None);
        assert_eq!(delete_target("Delete airdrop for 0x1234"), None);
        assert_eq!(delete_target(&format!("delete airdrop for {}", DEV_ADDRESS)), None);
    }
}
