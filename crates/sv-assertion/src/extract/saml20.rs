//! SAML 2.0 extraction.
//!
//! ```xml
//! <Assertion Version="2.0" ID="...">
//!   <Subject><NameID>alice</NameID></Subject>
//!   <Conditions NotBefore="..." NotOnOrAfter="...">
//!     <AudienceRestriction><Audience>urn:app</Audience></AudienceRestriction>
//!   </Conditions>
//!   <AttributeStatement>
//!     <Attribute Name="email"><AttributeValue>a@b.com</AttributeValue></Attribute>
//!   </AttributeStatement>
//! </Assertion>
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{ClaimValue, Conditions, IdentityProfile, NAME_IDENTIFIER_CLAIM, SAML20_NS};
use crate::xml::Element;

/// Extracts `Conditions` from a SAML 2.0 assertion.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] on a missing or
/// unreadable field.
pub fn conditions(root: &Element) -> ValidationResult<Conditions> {
    let conditions = root
        .child(SAML20_NS, "Conditions")
        .ok_or_else(|| ValidationError::malformed("Conditions is missing"))?;

    Ok(Conditions {
        not_before: super::timestamp(conditions, "NotBefore")?,
        not_on_or_after: super::timestamp(conditions, "NotOnOrAfter")?,
        audience: super::single_audience(
            conditions.children_named(SAML20_NS, "AudienceRestriction"),
            SAML20_NS,
        )?,
    })
}

/// Builds the identity profile of a SAML 2.0 assertion.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] if `Subject` is missing
/// or an `Attribute` has no `Name`.
pub fn profile(root: &Element) -> ValidationResult<IdentityProfile> {
    let subject = root
        .child(SAML20_NS, "Subject")
        .ok_or_else(|| ValidationError::malformed("Subject is missing"))?;

    let mut profile = IdentityProfile::new();

    for attribute in root
        .children_named(SAML20_NS, "AttributeStatement")
        .flat_map(|statement| statement.children_named(SAML20_NS, "Attribute"))
    {
        let name = attribute
            .attribute("Name")
            .ok_or_else(|| ValidationError::malformed("Attribute/@Name is missing"))?;
        if let Some(value) = super::attribute_values(attribute, SAML20_NS) {
            profile.insert(name, value);
        }
    }

    if let Some(name_id) = subject.child(SAML20_NS, "NameID") {
        profile.insert(NAME_IDENTIFIER_CLAIM, ClaimValue::Single(name_id.text.clone()));
    }

    Ok(profile)
}
