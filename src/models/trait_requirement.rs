// src/models/trait_requirement.rs
//! Trait requirement data model.
//!
//! A trait requirement pairs a trait name (e.g. `followers`) with a requirement
//! string. The requirement is either a bare value, which means equality, or an
//! explicit `{operation}:{value}` pair such as `gte:1000` or `in:US,CA,MX`.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator attached to a trait requirement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Operation {
    /// Every operator understood by the resource grammar.
    pub const ALL: [Operation; 6] = [
        Operation::Eq,
        Operation::Gt,
        Operation::Gte,
        Operation::Lt,
        Operation::Lte,
        Operation::In,
    ];

    /// Wire token for the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Eq => "eq",
            Operation::Gt => "gt",
            Operation::Gte => "gte",
            Operation::Lt => "lt",
            Operation::Lte => "lte",
            Operation::In => "in",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a token is not one of `eq, gt, gte, lt, lte, in`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trait operation '{0}'")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Splits a requirement string into its operation and value.
///
/// `"gt:100"` yields `(Gt, "100")`. Anything without a recognised operator
/// prefix is an implicit equality on the whole string, so `"true"` yields
/// `(Eq, "true")` and `"foo:bar"` yields `(Eq, "foo:bar")`.
pub fn split_requirement(requirement: &str) -> (Operation, &str) {
    if let Some((prefix, value)) = requirement.split_once(':') {
        if let Ok(operation) = prefix.parse::<Operation>() {
            return (operation, value);
        }
    }
    (Operation::Eq, requirement)
}

/// Rewrites a requirement in its explicit `{operation}:{value}` form.
pub fn normalize_requirement(requirement: &str) -> String {
    let (operation, value) = split_requirement(requirement);
    format!("{}:{}", operation, value)
}

/// Ordered mapping from trait name to requirement string.
///
/// Keys are unique and iteration follows insertion order, which is the
/// order trait resources are written into a message. Equality ignores
/// ordering. Serializes as a JSON object.
#[derive(Debug, Clone, Default, Eq)]
pub struct TraitRequirements {
    entries: Vec<(String, String)>,
}

impl TraitRequirements {
    pub fn new() -> Self {
        TraitRequirements { entries: Vec::new() }
    }

    /// Inserts a requirement, replacing the value of an existing key in place.
    pub fn insert(&mut self, name: impl Into<String>, requirement: impl Into<String>) {
        let name = name.into();
        let requirement = requirement.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = requirement,
            None => self.entries.push((name, requirement)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Copy of this mapping with every value in explicit `{operation}:{value}` form.
    pub fn normalized(&self) -> TraitRequirements {
        self.iter()
            .map(|(name, requirement)| (name, normalize_requirement(requirement)))
            .collect()
    }
}

impl PartialEq for TraitRequirements {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, requirement)| other.get(name) == Some(requirement))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TraitRequirements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut traits = TraitRequirements::new();
        for (name, requirement) in iter {
            traits.insert(name, requirement);
        }
        traits
    }
}

impl Serialize for TraitRequirements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, requirement) in self.iter() {
            map.serialize_entry(name, requirement)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TraitRequirements {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TraitsVisitor;

        impl<'de> Visitor<'de> for TraitsVisitor {
            type Value = TraitRequirements;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of trait name to requirement string")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut traits = TraitRequirements::new();
                while let Some((name, requirement)) = access.next_entry::<String, String>()? {
                    traits.insert(name, requirement);
                }
                Ok(traits)
            }
        }

        deserializer.deserialize_map(TraitsVisitor)
    }
}
