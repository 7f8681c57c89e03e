// src/message/resources.rs
//! Resource URN grammar.
//!
//! Every claim a message carries is one line of its `Resources:` section:
//!
//! ```text
//! urn:verify:provider:{provider}
//! urn:verify:provider:{provider}:{trait}:{operation}:{value}
//! urn:verify:action:{action}
//! urn:verify:verificationid:{id}
//! ```
//!
//! Trait values may themselves contain colons, so trait resources are split
//! with a bounded count and everything after the operation is the value.
//! A provider-scoped resource with a name but no known operation is still a
//! trait claim; it is kept as [`Resource::UnsupportedTrait`] so that callers
//! can reject it instead of losing it.

use crate::models::trait_requirement::Operation;

pub const PROVIDER_PREFIX: &str = "urn:verify:provider:";
pub const ACTION_PREFIX: &str = "urn:verify:action:";
pub const VERIFICATION_ID_PREFIX: &str = "urn:verify:verificationid:";

const RESOURCES_HEADER: &str = "Resources:";
const ITEM_MARKER: &str = "- ";

/// A classified resource line, borrowing from the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// `urn:verify:provider:{provider}`
    Provider(&'a str),
    /// `urn:verify:provider:{provider}:{name}:{operation}:{value}`
    Trait {
        provider: &'a str,
        name: &'a str,
        operation: Operation,
        value: &'a str,
    },
    /// `urn:verify:provider:{provider}:{name}:{requirement}` where the
    /// requirement has no known operation, e.g. `neq:true` or `true`
    UnsupportedTrait {
        provider: &'a str,
        name: &'a str,
        requirement: &'a str,
    },
    /// `urn:verify:action:{action}`
    Action(&'a str),
    /// `urn:verify:verificationid:{id}`
    VerificationId(&'a str),
    /// Anything outside the grammar
    Other(&'a str),
}

impl<'a> Resource<'a> {
    /// Classifies one resource string.
    pub fn parse(resource: &'a str) -> Resource<'a> {
        if let Some(rest) = resource.strip_prefix(PROVIDER_PREFIX) {
            let segments: Vec<&str> = rest.splitn(3, ':').collect();
            return match segments[..] {
                [provider] if !provider.is_empty() => Resource::Provider(provider),
                [provider, name, requirement] if !provider.is_empty() && !name.is_empty() => {
                    match requirement
                        .split_once(':')
                        .and_then(|(operation, value)| Some((operation.parse::<Operation>().ok()?, value)))
                    {
                        Some((operation, value)) => Resource::Trait {
                            provider,
                            name,
                            operation,
                            value,
                        },
                        None => Resource::UnsupportedTrait {
                            provider,
                            name,
                            requirement,
                        },
                    }
                }
                _ => Resource::Other(resource),
            };
        }

        if let Some(action) = resource.strip_prefix(ACTION_PREFIX) {
            if !action.is_empty() {
                return Resource::Action(action);
            }
        }

        if let Some(id) = resource.strip_prefix(VERIFICATION_ID_PREFIX) {
            if !id.is_empty() {
                return Resource::VerificationId(id);
            }
        }

        Resource::Other(resource)
    }
}

/// A resource section that cannot be read as a single unambiguous claim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("Multiple providers found in SIWE message: {}", .0.join(", "))]
    MultipleProviders(Vec<String>),

    #[error("Multiple actions found in SIWE message: {}", .0.join(", "))]
    MultipleActions(Vec<String>),

    #[error("Multiple verification ids found in SIWE message: {}", .0.join(", "))]
    MultipleVerificationIds(Vec<String>),

    #[error("Duplicate trait resources: {}", .0.join(", "))]
    DuplicateTraits(Vec<String>),

    #[error("Unsupported trait operations: {}", .0.join(", "))]
    UnsupportedTraits(Vec<String>),
}

/// Checks that provider, action and verification id each appear at most
/// once, that no provider names a trait twice, and that every trait
/// resource uses a known operation.
pub fn check_resources<S: AsRef<str>>(resources: &[S]) -> Result<(), ResourceError> {
    let mut providers = Vec::new();
    let mut actions = Vec::new();
    let mut ids = Vec::new();
    let mut traits: Vec<(&str, &str)> = Vec::new();
    let mut duplicates = Vec::new();
    let mut unsupported = Vec::new();

    for resource in resources {
        match Resource::parse(resource.as_ref()) {
            Resource::Provider(provider) => providers.push(provider.to_string()),
            Resource::Action(action) => actions.push(action.to_string()),
            Resource::VerificationId(id) => ids.push(id.to_string()),
            Resource::Trait { provider, name, .. } => {
                if traits.contains(&(provider, name)) {
                    duplicates.push(format!("{}:{}", provider, name));
                } else {
                    traits.push((provider, name));
                }
            }
            Resource::UnsupportedTrait {
                provider,
                name,
                requirement,
            } => unsupported.push(format!("{}:{}:{}", provider, name, requirement)),
            Resource::Other(_) => {}
        }
    }

    if providers.len() > 1 {
        return Err(ResourceError::MultipleProviders(providers));
    }
    if actions.len() > 1 {
        return Err(ResourceError::MultipleActions(actions));
    }
    if ids.len() > 1 {
        return Err(ResourceError::MultipleVerificationIds(ids));
    }
    if !duplicates.is_empty() {
        return Err(ResourceError::DuplicateTraits(duplicates));
    }
    if !unsupported.is_empty() {
        return Err(ResourceError::UnsupportedTraits(unsupported));
    }
    Ok(())
}

pub fn provider_urn(provider: &str) -> String {
    format!("{}{}", PROVIDER_PREFIX, provider)
}

pub fn trait_urn(provider: &str, name: &str, operation: Operation, value: &str) -> String {
    format!("{}{}:{}:{}:{}", PROVIDER_PREFIX, provider, name, operation, value)
}

pub fn action_urn(action: &str) -> String {
    format!("{}{}", ACTION_PREFIX, action)
}

pub fn verification_id_urn(id: &str) -> String {
    format!("{}{}", VERIFICATION_ID_PREFIX, id)
}

/// Extracts the `Resources:` block of a serialized message.
///
/// The block is the contiguous run of `- ` prefixed lines directly after the
/// `Resources:` header. Returns `None` when there is no header or the run is
/// empty.
pub fn extract_resources(message: &str) -> Option<Vec<String>> {
    let mut lines = message.lines();
    lines.find(|line| line.trim() == RESOURCES_HEADER)?;

    let resources: Vec<String> = lines
        .map_while(|line| line.strip_prefix(ITEM_MARKER))
        .map(str::trim)
        .filter(|resource| !resource.is_empty())
        .map(str::to_string)
        .collect();

    if resources.is_empty() {
        None
    } else {
        Some(resources)
    }
}

/// The provider named by the first bare provider resource.
pub fn find_provider<S: AsRef<str>>(resources: &[S]) -> Option<&str> {
    resources.iter().find_map(|r| match Resource::parse(r.as_ref()) {
        Resource::Provider(provider) => Some(provider),
        _ => None,
    })
}

/// The action named by the first action resource.
pub fn find_action<S: AsRef<str>>(resources: &[S]) -> Option<&str> {
    resources.iter().find_map(|r| match Resource::parse(r.as_ref()) {
        Resource::Action(action) => Some(action),
        _ => None,
    })
}

/// The correlation id named by the first verification-id resource.
pub fn find_verification_id<S: AsRef<str>>(resources: &[S]) -> Option<&str> {
    resources.iter().find_map(|r| match Resource::parse(r.as_ref()) {
        Resource::VerificationId(id) => Some(id),
        _ => None,
    })
}
