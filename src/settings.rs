// src/settings.rs
//! Application configuration.
//!
//! Settings are loaded once at startup and handed to the components that need
//! them. Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/{RUN_MODE}.toml` (optional, `RUN_MODE` defaults to `development`)
//! 4. Environment variables prefixed with `BASE_VERIFY_` (e.g. `BASE_VERIFY_SECRET_KEY`)
//!
//! A `.env` file is read by `main` before loading, so its entries act as
//! environment variables.

use crate::models::trait_requirement::TraitRequirements;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Runtime configuration shared by the message builder, the Base Verify
/// client and the API server.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Canonical URL of this application, used as message domain and URI
    pub app_url: String,

    /// Base Verify REST API root
    pub api_url: String,

    /// Base Verify mini app, where users without a verification are sent
    pub mini_app_url: String,

    /// Bearer secret for the Base Verify API (server-side only)
    pub secret_key: Option<String>,

    /// Address the API server listens on
    pub bind_addr: SocketAddr,

    /// Chain ID embedded in built messages
    pub chain_id: u64,

    /// Provider a submitted message must target
    pub expected_provider: String,

    /// Action a submitted message must declare
    pub expected_action: String,

    /// Trait requirements a submitted message must embed, exactly. A
    /// configured table replaces the default requirements as a whole.
    #[serde(default = "default_expected_traits")]
    pub expected_traits: TraitRequirements,
}

fn default_expected_traits() -> TraitRequirements {
    [("followers", "gt:100")].into_iter().collect()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            app_url: "https://baseverifydemo.com".to_string(),
            api_url: "https://verify.base.dev/v1".to_string(),
            mini_app_url: "https://verify.base.dev".to_string(),
            secret_key: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            chain_id: crate::message::builder::DEFAULT_CHAIN_ID,
            expected_provider: "x".to_string(),
            expected_action: "base_verify_token".to_string(),
            expected_traits: default_expected_traits(),
        }
    }
}

impl Settings {
    /// Loads settings from files and the environment on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config"));

        Self::load_from(&config_dir, &run_mode)
    }

    /// Loads settings from `config_dir` for the given run mode.
    pub fn load_from(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        log::info!(
            "Loading configuration from {} (run mode: {})",
            config_dir.display(),
            run_mode
        );

        let defaults = Settings::default();

        // expected_traits has no layered default: tables from different
        // sources would be merged key by key
        let settings = Config::builder()
            .set_default("app_url", defaults.app_url)?
            .set_default("api_url", defaults.api_url)?
            .set_default("mini_app_url", defaults.mini_app_url)?
            .set_default("bind_addr", defaults.bind_addr.to_string())?
            .set_default("chain_id", defaults.chain_id as i64)?
            .set_default("expected_provider", defaults.expected_provider)?
            .set_default("expected_action", defaults.expected_action)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(Environment::with_prefix("BASE_VERIFY").try_parsing(true))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app_domain().is_none() {
            return Err(ConfigError::Message(format!(
                "app_url '{}' must be an absolute URL with a host",
                self.app_url
            )));
        }
        if self.expected_provider.contains(':') {
            return Err(ConfigError::Message(
                "expected_provider must not contain ':'".into(),
            ));
        }
        Ok(())
    }

    /// Authority of `app_url` (host and explicit port), used as the domain
    /// of built messages.
    pub fn app_domain(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.app_url).ok()?;
        let host = url.host_str()?;
        Some(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Endpoint that issues verification tokens.
    pub fn verify_token_url(&self) -> String {
        format!(
            "{}/base_verify_token",
            self.api_url.trim_end_matches('/')
        )
    }
}
