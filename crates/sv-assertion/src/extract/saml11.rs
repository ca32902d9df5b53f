//! SAML 1.1 extraction.
//!
//! The subject lives inside the attribute statement and attributes are
//! named by an `AttributeNamespace` / `AttributeName` pair:
//!
//! ```xml
//! <saml:Assertion MajorVersion="1" MinorVersion="1" AssertionID="...">
//!   <saml:Conditions NotBefore="..." NotOnOrAfter="...">
//!     <saml:AudienceRestrictionCondition>
//!       <saml:Audience>urn:app</saml:Audience>
//!     </saml:AudienceRestrictionCondition>
//!   </saml:Conditions>
//!   <saml:AttributeStatement>
//!     <saml:Subject><saml:NameIdentifier>alice</saml:NameIdentifier></saml:Subject>
//!     <saml:Attribute AttributeNamespace="ns1" AttributeName="role">
//!       <saml:AttributeValue>admin</saml:AttributeValue>
//!     </saml:Attribute>
//!   </saml:AttributeStatement>
//! </saml:Assertion>
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{ClaimValue, Conditions, IdentityProfile, NAME_IDENTIFIER_CLAIM, SAML11_NS};
use crate::xml::Element;

/// Extracts `Conditions` from a SAML 1.1 assertion.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] on a missing or
/// unreadable field.
pub fn conditions(root: &Element) -> ValidationResult<Conditions> {
    let conditions = root
        .child(SAML11_NS, "Conditions")
        .ok_or_else(|| ValidationError::malformed("Conditions is missing"))?;

    Ok(Conditions {
        not_before: super::timestamp(conditions, "NotBefore")?,
        not_on_or_after: super::timestamp(conditions, "NotOnOrAfter")?,
        audience: super::single_audience(
            conditions.children_named(SAML11_NS, "AudienceRestrictionCondition"),
            SAML11_NS,
        )?,
    })
}

/// Builds the identity profile of a SAML 1.1 assertion.
///
/// Attributes of every `AttributeStatement` are merged, as for SAML 2.0.
/// Each statement carries its own `Subject`; the name identifier is taken
/// from the first one that has a `NameIdentifier`. An assertion without
/// attribute statements yields an empty profile.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] if an attribute
/// statement has no `Subject` or an attribute is not fully named.
pub fn profile(root: &Element) -> ValidationResult<IdentityProfile> {
    let mut profile = IdentityProfile::new();
    let mut name_identifier = None;

    for statement in root.children_named(SAML11_NS, "AttributeStatement") {
        let subject = statement
            .child(SAML11_NS, "Subject")
            .ok_or_else(|| ValidationError::malformed("AttributeStatement/Subject is missing"))?;
        if name_identifier.is_none() {
            name_identifier = subject.child(SAML11_NS, "NameIdentifier");
        }

        for attribute in statement.children_named(SAML11_NS, "Attribute") {
            let (Some(namespace), Some(name)) = (
                attribute.attribute("AttributeNamespace"),
                attribute.attribute("AttributeName"),
            ) else {
                return Err(ValidationError::malformed(
                    "Attribute needs both AttributeNamespace and AttributeName",
                ));
            };
            if let Some(value) = super::attribute_values(attribute, SAML11_NS) {
                profile.insert(format!("{namespace}/{name}"), value);
            }
        }
    }

    if let Some(name_id) = name_identifier {
        profile.insert(NAME_IDENTIFIER_CLAIM, ClaimValue::Single(name_id.text.clone()));
    }

    Ok(profile)
}
