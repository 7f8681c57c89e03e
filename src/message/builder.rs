// src/message/builder.rs
//! Authentication message builder.
//!
//! Builds the Sign-In With Ethereum message a wallet signs before the
//! verification backend issues a token. The message embeds the requested
//! action, the identity provider and the trait requirements as resource URNs.
//! Field validation and text layout come from the `siwe` crate.

use crate::message::resources::{action_urn, verification_id_urn};
use crate::message::trait_codec::encode_traits;
use crate::models::auth_message::{format_timestamp, AuthMessage};
use crate::models::trait_requirement::TraitRequirements;
use crate::settings::Settings;
use crate::utils::crypto::parse_address;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Base mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 8453;

pub const DEFAULT_STATEMENT: &str = "Sign in with X verification";

/// Lifetime of a message, from issuance to expiration.
pub const MESSAGE_TTL_SECS: i64 = 60 * 60;

const NONCE_LENGTH: usize = 17;

/// Errors raised when an input cannot be represented in an EIP-4361 message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBuildError {
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid domain '{0}', expected an authority such as example.com")]
    InvalidDomain(String),

    #[error("invalid URI '{0}'")]
    InvalidUri(String),

    /// Raised for trait values that are not URI-safe, e.g. containing spaces.
    #[error("invalid resource '{0}'")]
    InvalidResource(String),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Inputs for a single message.
///
/// Only `address` is required. Unset `domain`, `uri`, `chain_id` and
/// `statement` fall back to the builder's defaults. Empty `provider`,
/// `action` and `verification_id` strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    pub address: String,
    pub action: Option<String>,
    pub provider: Option<String>,
    pub traits: TraitRequirements,
    pub verification_id: Option<String>,
    pub domain: Option<String>,
    pub uri: Option<String>,
    pub chain_id: Option<u64>,
    pub statement: Option<String>,
}

impl MessageOptions {
    pub fn new(address: impl Into<String>) -> Self {
        MessageOptions {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn traits(mut self, traits: TraitRequirements) -> Self {
        self.traits = traits;
        self
    }

    pub fn verification_id(mut self, id: impl Into<String>) -> Self {
        self.verification_id = Some(id.into());
        self
    }
}

/// A serialized message and the nonce embedded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltMessage {
    pub message: String,
    pub nonce: String,
}

/// Builds messages scoped to one application.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    domain: String,
    uri: String,
    chain_id: u64,
}

impl MessageBuilder {
    /// Creates a builder whose messages default to `domain` and `uri`.
    pub fn new(domain: impl Into<String>, uri: impl Into<String>) -> Self {
        MessageBuilder {
            domain: domain.into(),
            uri: uri.into(),
            chain_id: DEFAULT_CHAIN_ID,
        }
    }

    /// Creates a builder scoped to the configured application URL: its
    /// authority becomes the domain, the full URL the URI.
    pub fn from_settings(settings: &Settings) -> Self {
        MessageBuilder {
            domain: settings
                .app_domain()
                .unwrap_or_else(|| settings.app_url.clone()),
            uri: settings.app_url.clone(),
            chain_id: settings.chain_id,
        }
    }

    /// Builds a message with a fresh nonce, issued now.
    pub fn build(&self, options: &MessageOptions) -> Result<BuiltMessage, MessageBuildError> {
        self.build_at(options, generate_nonce(), Utc::now())
    }

    /// Builds a message with the given nonce and issuance time.
    pub fn build_at(
        &self,
        options: &MessageOptions,
        nonce: String,
        issued_at: DateTime<Utc>,
    ) -> Result<BuiltMessage, MessageBuildError> {
        let message = self.assemble(options, nonce, issued_at)?;
        Ok(BuiltMessage {
            message: message.to_string(),
            nonce: message.nonce().to_string(),
        })
    }

    /// Assembles the structured message without serializing it.
    pub fn assemble(
        &self,
        options: &MessageOptions,
        nonce: String,
        issued_at: DateTime<Utc>,
    ) -> Result<AuthMessage, MessageBuildError> {
        let address = parse_address(&options.address)
            .map_err(|_| MessageBuildError::InvalidAddress(options.address.clone()))?;

        let domain = options.domain.as_deref().unwrap_or(&self.domain);
        let uri = options.uri.as_deref().unwrap_or(&self.uri);

        let message = siwe::Message {
            domain: domain
                .parse()
                .map_err(|_| MessageBuildError::InvalidDomain(domain.to_string()))?,
            address: address.0,
            statement: Some(
                options
                    .statement
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATEMENT.to_string()),
            ),
            uri: uri
                .parse()
                .map_err(|_| MessageBuildError::InvalidUri(uri.to_string()))?,
            version: siwe::Version::V1,
            chain_id: options.chain_id.unwrap_or(self.chain_id),
            nonce,
            issued_at: timestamp(issued_at)?,
            expiration_time: Some(timestamp(issued_at + Duration::seconds(MESSAGE_TTL_SECS))?),
            not_before: None,
            request_id: None,
            resources: build_resources(options)
                .into_iter()
                .map(|resource| {
                    resource
                        .parse()
                        .map_err(|_| MessageBuildError::InvalidResource(resource))
                })
                .collect::<Result<_, _>>()?,
        };

        Ok(AuthMessage::from(message))
    }
}

/// Millisecond-precision `Z` timestamp, kept verbatim by `siwe`.
fn timestamp(at: DateTime<Utc>) -> Result<siwe::TimeStamp, MessageBuildError> {
    let text = format_timestamp(&at);
    text.parse()
        .map_err(|_| MessageBuildError::InvalidTimestamp(text))
}

/// Resources in their fixed order: provider and its traits, action,
/// verification id. Traits are only written under a provider.
fn build_resources(options: &MessageOptions) -> Vec<String> {
    let mut resources = Vec::new();

    if let Some(provider) = non_empty(&options.provider) {
        resources.extend(encode_traits(provider, &options.traits));
    }

    if let Some(action) = non_empty(&options.action) {
        resources.push(action_urn(action));
    }

    if let Some(id) = non_empty(&options.verification_id) {
        resources.push(verification_id_urn(id));
    }

    resources
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Generates a random alphanumeric nonce from the thread-local CSPRNG.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::trait_codec::parse_traits;
    use chrono::TimeZone;

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const NONCE: &str = "a1b2c3d4e5f6g7h8i";

    fn builder() -> MessageBuilder {
        MessageBuilder::new("baseverifydemo.com", "https://baseverifydemo.com")
    }

    fn followers_over_100() -> TraitRequirements {
        [("followers", "gt:100")].into_iter().collect()
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_expiration_is_one_hour_after_issuance() {
        let message = builder()
            .assemble(&MessageOptions::new(ADDRESS), NONCE.to_string(), issued_at())
            .unwrap();
        assert_eq!(message.issued_at(), "2025-03-04T05:06:07.000Z");
        assert_eq!(message.expiration_time().as_deref(), Some("2025-03-04T06:06:07.000Z"));
    }

    #[test]
    fn test_resource_order() {
        let options = MessageOptions::new(ADDRESS)
            .action("verify_token")
            .provider("x")
            .traits([("followers", "gt:100"), ("verified", "true")].into_iter().collect())
            .verification_id("abc");

        let message = builder().assemble(&options, NONCE.to_string(), Utc::now()).unwrap();
        assert_eq!(
            message.resources(),
            [
                "urn:verify:provider:x",
                "urn:verify:provider:x:followers:gt:100",
                "urn:verify:provider:x:verified:eq:true",
                "urn:verify:action:verify_token",
                "urn:verify:verificationid:abc",
            ]
        );
    }

    #[test]
    fn test_exact_serialization() {
        let options = MessageOptions::new(ADDRESS)
            .action("base_verify_token")
            .provider("x")
            .traits(followers_over_100());

        let built = builder()
            .build_at(&options, NONCE.to_string(), issued_at())
            .unwrap();

        let expected = "\
baseverifydemo.com wants you to sign in with your Ethereum account:
0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266

Sign in with X verification

URI: https://baseverifydemo.com
Version: 1
Chain ID: 8453
Nonce: a1b2c3d4e5f6g7h8i
Issued At: 2025-03-04T05:06:07.000Z
Expiration Time: 2025-03-04T06:06:07.000Z
Resources:
- urn:verify:provider:x
- urn:verify:provider:x:followers:gt:100
- urn:verify:action:base_verify_token";

        assert_eq!(built.message, expected);
        assert_eq!(built.nonce, NONCE);
    }

    #[test]
    fn test_lowercase_address_is_checksummed() {
        let built = builder()
            .build(&MessageOptions::new(ADDRESS.to_lowercase()))
            .unwrap();
        assert_eq!(built.message.lines().nth(1), Some(ADDRESS));
    }

    #[test]
    fn test_no_resources_section_when_empty() {
        let built = builder().build(&MessageOptions::new(ADDRESS)).unwrap();
        assert!(!built.message.contains("Resources:"));
        assert_eq!(parse_traits(&built.message), None);
    }

    #[test]
    fn test_empty_provider_is_skipped() {
        let options = MessageOptions::new(ADDRESS)
            .action("get_verifications")
            .provider("");
        let message = builder().assemble(&options, NONCE.to_string(), Utc::now()).unwrap();
        assert_eq!(message.resources(), ["urn:verify:action:get_verifications"]);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut options = MessageOptions::new(ADDRESS);
        options.domain = Some("example.org".to_string());
        options.uri = Some("https://example.org/login".to_string());
        options.chain_id = Some(84532);
        options.statement = Some("Claim your airdrop".to_string());

        let text = builder().build(&options).unwrap().message;
        assert!(text.starts_with("example.org wants you to sign in"));
        assert!(text.contains("\n\nClaim your airdrop\n\n"));
        assert!(text.contains("URI: https://example.org/login\n"));
        assert!(text.contains("Chain ID: 84532\n"));
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let err = builder().build(&MessageOptions::new("0xabc")).unwrap_err();
        assert_eq!(err, MessageBuildError::InvalidAddress("0xabc".to_string()));

        let mut options = MessageOptions::new(ADDRESS);
        options.domain = Some("https://example.org/path".to_string());
        assert!(matches!(
            builder().build(&options),
            Err(MessageBuildError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_whitespace_in_trait_value_is_rejected() {
        // A space would break the resource line when the message is re-read
        let options = MessageOptions::new(ADDRESS)
            .provider("x")
            .traits([("country", "in:US, CA")].into_iter().collect());
        assert_eq!(
            builder().build(&options).unwrap_err(),
            MessageBuildError::InvalidResource("urn:verify:provider:x:country:in:US, CA".to_string())
        );

        let trailing = MessageOptions::new(ADDRESS)
            .provider("x")
            .traits([("followers", "gt:100 ")].into_iter().collect());
        assert!(matches!(
            builder().build(&trailing),
            Err(MessageBuildError::InvalidResource(_))
        ));
    }

    #[test]
    fn test_built_message_round_trips_traits() {
        let options = MessageOptions::new(ADDRESS)
            .provider("x")
            .traits(followers_over_100());
        let parsed = parse_traits(&builder().build(&options).unwrap().message).unwrap();
        assert_eq!(parsed.provider, "x");
        assert_eq!(parsed.traits, followers_over_100());
    }

    #[test]
    fn test_nonces_are_fresh() {
        let first = generate_nonce();
        let second = generate_nonce();
        assert_eq!(first.len(), NONCE_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
