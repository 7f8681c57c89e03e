// src/main.rs

//! # Base Verify Demo - Main Entry Point
//!
//! Loads configuration, wires the Base Verify client and the airdrop registry
//! into the API server, and serves it.
//!
//! ## Environment Variables
//! - `BASE_VERIFY_SECRET_KEY`: Base Verify API secret (required for verification)
//! - `BASE_VERIFY_APP_URL`: Public URL of this app, its host is the message domain, the full URL the URI
//! - `BASE_VERIFY_API_URL`: (Optional) Base Verify API root
//! - `BASE_VERIFY_BIND_ADDR`: (Optional) Listen address (default: 127.0.0.1:3000)
//! - `RUN_MODE` / `CONFIG_DIR`: (Optional) Select `config/{RUN_MODE}.toml`
//! - `RUST_LOG`: (Optional) Log filter

use anyhow::Context;
use base_verify_demo::services::api_server::ApiServer;
use base_verify_demo::services::verifier::BaseVerifyClient;
use base_verify_demo::settings::Settings;
use base_verify_demo::storage::airdrop_store::InMemoryAirdropStore;
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("Failed to load configuration")?;
    if settings.secret_key.is_none() {
        log::warn!("BASE_VERIFY_SECRET_KEY is not set; token verification will fail");
    }

    let verifier = Arc::new(BaseVerifyClient::new(&settings));
    let store = Arc::new(InMemoryAirdropStore::new());
    let coinbase_store = Arc::new(InMemoryAirdropStore::new());
    let addr = settings.bind_addr;

    log::info!("Expecting provider '{}' with traits {:?}", settings.expected_provider, settings.expected_traits);
    log::info!("Available endpoints:");
    log::info!("- POST /api/build-message");
    log::info!("- POST /api/verify-token");
    log::info!("- GET  /api/users");
    log::info!("- GET  /api/coinbase/users");
    log::info!("- POST /api/delete-airdrop");

    ApiServer::new(settings, verifier, store)
        .with_coinbase_store(coinbase_store)
        .run(addr)
        .await
        .context("API server failed")
}
