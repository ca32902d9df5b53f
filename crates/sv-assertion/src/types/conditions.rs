//! Assertion conditions.

use chrono::{DateTime, Utc};

/// The validity window and audience restriction of an assertion.
///
/// Extracted fresh from every assertion; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions {
    /// The assertion is not valid before this instant.
    pub not_before: DateTime<Utc>,
    /// The assertion is not valid at or after this instant.
    pub not_on_or_after: DateTime<Utc>,
    /// The single audience the assertion is issued for.
    pub audience: String,
}
