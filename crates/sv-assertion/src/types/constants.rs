//! SAML namespace URIs and well-known claim names.

/// SAML 1.x assertion namespace URI, shared by SAML 1.0 and 1.1.
pub const SAML11_NS: &str = "urn:oasis:names:tc:SAML:1.0:assertion";

/// SAML 2.0 assertion namespace URI.
pub const SAML20_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// Claim under which the subject's name identifier is stored.
pub const NAME_IDENTIFIER_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

/// Attributes that may carry the identifier a signature reference points at.
///
/// `AssertionID` is the SAML 1.1 spelling, `ID` the SAML 2.0 one.
pub const ID_ATTRIBUTES: &[&str] = &["AssertionID", "ID", "Id"];
