// src/message/trait_codec.rs
//! Trait codec.
//!
//! Encodes a trait requirement mapping into provider-scoped resource URNs and
//! decodes the mapping back out of a serialized message.
//!
//! The operation segment is always written, `eq` included, so every trait
//! resource has the same shape. Decoding drops an `eq` operation again and
//! yields the bare value.

use crate::message::resources::{
    extract_resources, find_provider, provider_urn, trait_urn, Resource,
};
use crate::models::trait_requirement::{split_requirement, Operation, TraitRequirements};

/// Provider and trait requirements recovered from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTraits {
    pub provider: String,
    pub traits: TraitRequirements,
}

/// Encodes one requirement as a trait resource.
pub fn encode_trait(provider: &str, name: &str, requirement: &str) -> String {
    let (operation, value) = split_requirement(requirement);
    trait_urn(provider, name, operation, value)
}

/// Encodes a provider and its trait requirements as resources: the bare
/// provider URN first, then one URN per trait in mapping order.
pub fn encode_traits(provider: &str, traits: &TraitRequirements) -> Vec<String> {
    std::iter::once(provider_urn(provider))
        .chain(
            traits
                .iter()
                .map(|(name, requirement)| encode_trait(provider, name, requirement)),
        )
        .collect()
}

/// Decodes provider-scoped trait requirements from resource strings.
///
/// Returns `None` when no bare provider resource is present. Trait resources
/// for other providers are ignored. A trait with an unknown operation keeps
/// its requirement verbatim, e.g. `neq:true`.
pub fn decode_resources<S: AsRef<str>>(resources: &[S]) -> Option<ParsedTraits> {
    let provider = find_provider(resources)?;

    let traits = resources
        .iter()
        .filter_map(|resource| match Resource::parse(resource.as_ref()) {
            Resource::Trait {
                provider: owner,
                name,
                operation,
                value,
            } if owner == provider => Some((name, decoded_requirement(operation, value))),
            Resource::UnsupportedTrait {
                provider: owner,
                name,
                requirement,
            } if owner == provider => Some((name, requirement.to_string())),
            _ => None,
        })
        .collect();

    Some(ParsedTraits {
        provider: provider.to_string(),
        traits,
    })
}

/// Decodes provider-scoped trait requirements from a serialized message.
///
/// Returns `None` when the message has no `Resources:` block or the block
/// names no provider.
pub fn parse_traits(message: &str) -> Option<ParsedTraits> {
    let resources = extract_resources(message)?;
    decode_resources(&resources)
}

fn decoded_requirement(operation: Operation, value: &str) -> String {
    match operation {
        Operation::Eq => value.to_string(),
        _ => format!("{}:{}", operation, value),
    }
}
