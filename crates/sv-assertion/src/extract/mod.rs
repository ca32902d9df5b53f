//! Typed extraction of conditions and attributes.
//!
//! SAML 1.1 and SAML 2.0 lay out conditions, subject and attributes
//! differently. Each version has its own extractor; [`conditions`] and
//! [`profile`] dispatch on the detected [`AssertionVersion`] so a 2.0
//! assertion is never read with 1.1 paths and vice versa.

pub mod saml11;
pub mod saml20;

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationResult};
use crate::types::{AssertionVersion, ClaimValue, Conditions, IdentityProfile};
use crate::xml::Element;

/// Extracts the validity window and audience.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] if `Conditions`, either
/// timestamp or the audience is missing or unreadable.
pub fn conditions(root: &Element, version: AssertionVersion) -> ValidationResult<Conditions> {
    match version {
        AssertionVersion::V1_1 => saml11::conditions(root),
        AssertionVersion::V2_0 => saml20::conditions(root),
    }
}

/// Extracts the subject's name identifier and attributes.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] if the subject is
/// missing or an attribute has no name.
pub fn profile(root: &Element, version: AssertionVersion) -> ValidationResult<IdentityProfile> {
    match version {
        AssertionVersion::V1_1 => saml11::profile(root),
        AssertionVersion::V2_0 => saml20::profile(root),
    }
}

/// Reads a required `xs:dateTime` attribute of `Conditions`.
///
/// The value must carry a time zone (`Z` or an offset); a local time is
/// not guessed at.
fn timestamp(conditions: &Element, name: &str) -> ValidationResult<DateTime<Utc>> {
    let value = conditions
        .attribute(name)
        .ok_or_else(|| ValidationError::malformed(format!("Conditions/@{name} is missing")))?;
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ValidationError::malformed(format!("Conditions/@{name} is not a valid timestamp: {e}")))
}

/// Reads the single `Audience` under a restriction element.
fn single_audience<'a>(
    restrictions: impl Iterator<Item = &'a Element>,
    namespace: &str,
) -> ValidationResult<String> {
    let mut audiences = restrictions.flat_map(|r| r.children_named(namespace, "Audience"));
    let audience = audiences
        .next()
        .ok_or_else(|| ValidationError::malformed("audience restriction is missing"))?;
    if audiences.next().is_some() {
        return Err(ValidationError::malformed(
            "more than one audience is restricted",
        ));
    }
    Ok(audience.text.clone())
}

/// Collects the text of every `AttributeValue` child.
fn attribute_values(attribute: &Element, namespace: &str) -> Option<ClaimValue> {
    ClaimValue::from_values(
        attribute
            .children_named(namespace, "AttributeValue")
            .map(|v| v.text.clone())
            .collect(),
    )
}
