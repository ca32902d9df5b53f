//! The identity profile produced by a successful validation.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::NAME_IDENTIFIER_CLAIM;

/// One or more values of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// A claim with exactly one value.
    Single(String),
    /// A claim with several values, in document order.
    Multiple(Vec<String>),
}

impl ClaimValue {
    /// Builds a claim value from a list, collapsing a single item.
    ///
    /// Returns `None` for an empty list.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Self::Single),
            _ => Some(Self::Multiple(values)),
        }
    }

    /// Returns all values in document order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Returns the value if there is exactly one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    fn extend(self, more: Self) -> Self {
        let mut values = self.into_vec();
        values.extend(more.into_vec());
        Self::Multiple(values)
    }

    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(value) => vec![value],
            Self::Multiple(values) => values,
        }
    }
}

/// Flat mapping from claim name to claim values.
///
/// SAML 2.0 attributes are keyed by their `Name`, SAML 1.1 attributes by
/// `AttributeNamespace/AttributeName`. The subject's name identifier, when
/// present, is stored under [`NAME_IDENTIFIER_CLAIM`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityProfile {
    claims: BTreeMap<String, ClaimValue>,
}

impl IdentityProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds values to a claim. Values for a claim already present are
    /// appended to it.
    pub fn insert(&mut self, claim: impl Into<String>, value: ClaimValue) {
        match self.claims.entry(claim.into()) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            btree_map::Entry::Occupied(mut entry) => {
                let existing = entry.insert(ClaimValue::Multiple(Vec::new()));
                entry.insert(existing.extend(value));
            }
        }
    }

    /// Returns the values of a claim.
    pub fn get(&self, claim: &str) -> Option<&ClaimValue> {
        self.claims.get(claim)
    }

    /// Returns the subject's name identifier.
    pub fn name_identifier(&self) -> Option<&str> {
        self.get(NAME_IDENTIFIER_CLAIM).and_then(ClaimValue::as_single)
    }

    /// Iterates over claims in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.claims.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of claims.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns true if the profile has no claims.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl IntoIterator for IdentityProfile {
    type Item = (String, ClaimValue);
    type IntoIter = btree_map::IntoIter<String, ClaimValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.into_iter()
    }
}
