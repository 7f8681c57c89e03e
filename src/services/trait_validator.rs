// src/services/trait_validator.rs
//! Trait requirement validation.
//!
//! Checks that a signed message embeds exactly the provider and trait
//! requirements the server expects. This is tamper detection, not a
//! satisfaction check: a message with weaker, stronger, fewer or extra
//! requirements is rejected. Whether the subject actually meets the
//! requirements is decided by the Base Verify backend.

use crate::message::resources::{check_resources, extract_resources};
use crate::message::trait_codec::{decode_resources, ParsedTraits};
use crate::models::trait_requirement::TraitRequirements;
use serde::Serialize;

/// Outcome of [`validate_traits`].
///
/// Failures are ordinary results carrying a diagnostic in `error`; nothing
/// here is an exceptional condition.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_traits: Option<TraitRequirements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_traits: Option<TraitRequirements>,
}

/// A trait present on both sides with different requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Mismatch<'a> {
    name: &'a str,
    expected: &'a str,
    found: &'a str,
}

/// Validates the provider and trait requirements embedded in `message`.
///
/// # Process Flow
/// 1. Rejects repeated providers, actions, verification ids or trait names
///    and trait resources with an unknown operation
/// 2. Decodes the provider and traits from the message resources
/// 3. Compares the provider
/// 4. Normalizes both sides to explicit `{operation}:{value}` form
/// 5. Collects missing, mismatched and unexpected traits
pub fn validate_traits(
    message: &str,
    expected_provider: &str,
    expected_traits: &TraitRequirements,
) -> ValidationResult {
    let resources = extract_resources(message).unwrap_or_default();

    if let Err(e) = check_resources(&resources) {
        return ValidationResult {
            valid: false,
            error: Some(e.to_string()),
            provider: None,
            found_traits: None,
            expected_traits: Some(expected_traits.clone()),
        };
    }

    let Some(ParsedTraits {
        provider,
        traits: found_traits,
    }) = decode_resources(&resources)
    else {
        return ValidationResult {
            valid: false,
            error: Some("No provider found in SIWE message".to_string()),
            provider: None,
            found_traits: None,
            expected_traits: Some(expected_traits.clone()),
        };
    };

    if provider != expected_provider {
        return ValidationResult {
            valid: false,
            error: Some(format!(
                "Provider mismatch: expected '{}', found '{}'",
                expected_provider, provider
            )),
            provider: Some(provider),
            found_traits: Some(found_traits),
            expected_traits: Some(expected_traits.clone()),
        };
    }

    let error = compare(&expected_traits.normalized(), &found_traits.normalized());

    ValidationResult {
        valid: error.is_none(),
        error,
        provider: Some(provider),
        found_traits: Some(found_traits),
        expected_traits: Some(expected_traits.clone()),
    }
}

/// Describes every difference between two normalized mappings, or `None`
/// when they are identical.
fn compare(expected: &TraitRequirements, found: &TraitRequirements) -> Option<String> {
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for (name, expected_value) in expected.iter() {
        match found.get(name) {
            None => missing.push(name),
            Some(found_value) if found_value != expected_value => mismatched.push(Mismatch {
                name,
                expected: expected_value,
                found: found_value,
            }),
            Some(_) => {}
        }
    }

    let unexpected: Vec<&str> = found.keys().filter(|name| !expected.contains_key(name)).collect();

    let mut errors = Vec::new();
    if !missing.is_empty() {
        errors.push(format!("Missing required traits: {}", missing.join(", ")));
    }
    if !mismatched.is_empty() {
        let details: Vec<String> = mismatched
            .iter()
            .map(|m| format!("{} (expected: {}, found: {})", m.name, m.expected, m.found))
            .collect();
        errors.push(format!("Trait value mismatch: {}", details.join("; ")));
    }
    if !unexpected.is_empty() {
        errors.push(format!("Unexpected traits: {}", unexpected.join(", ")));
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors.join(". "))
    }
}
