// src/services/verifier.rs
//! Client for the Base Verify token endpoint.
//!
//! Forwards a signed authentication message to Base Verify, which checks the
//! signature, looks up the subject's verification with the declared provider
//! and evaluates the embedded trait requirements. Responses are decoded into
//! [`VerificationOutcome`] here and nowhere else.

use crate::models::verification::VerificationOutcome;
use crate::settings::Settings;
use async_trait::async_trait;
use serde::Serialize;

/// Errors raised before a Base Verify response could be read.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Base Verify secret key is not configured")]
    MissingSecretKey,

    #[error("Request to Base Verify failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Anything that can turn a signed message into a verification outcome.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    async fn verify_token(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<VerificationOutcome, ClientError>;
}

#[derive(Serialize)]
struct VerifyTokenRequest<'a> {
    signature: &'a str,
    message: &'a str,
}

/// HTTP client for `POST {api_url}/base_verify_token`.
///
/// # Security Notes
/// - The secret key is sent as a bearer token and must stay server-side
/// - Requests without a configured key fail before anything is sent
pub struct BaseVerifyClient {
    http: reqwest::Client,
    endpoint: String,
    secret_key: Option<String>,
}

impl BaseVerifyClient {
    pub fn new(settings: &Settings) -> Self {
        BaseVerifyClient {
            http: reqwest::Client::new(),
            endpoint: settings.verify_token_url(),
            secret_key: settings.secret_key.clone().filter(|key| !key.is_empty()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VerificationBackend for BaseVerifyClient {
    /// Submits `message` and `signature` for verification.
    ///
    /// Any HTTP answer, including 4xx and 5xx, is a successful call and is
    /// returned as an outcome. Only missing configuration and transport
    /// failures are errors.
    async fn verify_token(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<VerificationOutcome, ClientError> {
        let secret_key = self.secret_key.as_deref().ok_or(ClientError::MissingSecretKey)?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(secret_key)
            .json(&VerifyTokenRequest { signature, message })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!("Base Verify answered {}: {}", status, body);

        let outcome = VerificationOutcome::from_response(status, &body);
        if !outcome.is_verified() {
            log::warn!("Base Verify rejected token request with status {}", status);
        }
        Ok(outcome)
    }
}
