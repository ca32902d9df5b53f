//! Validation error types.
//!
//! Every rejected assertion produces exactly one [`ValidationError`]; the
//! pipeline stops at the first failing check.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for assertion validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Assertion validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No `ds:Signature` directly under the assertion root.
    #[error("signature not found under the assertion root")]
    SignatureMissing,

    /// The signature does not verify or the signing key is not trusted.
    #[error("invalid signature: {0}")]
    SignatureInvalid(String),

    /// The root carries neither `MajorVersion="1"` nor `Version="2.0"`.
    #[error("SAML assertion version not supported")]
    UnsupportedVersion,

    /// The current time is outside the validity window.
    #[error("token has expired or is not yet valid (valid from {not_before} until {not_on_or_after})")]
    Expired {
        /// `NotBefore` from the assertion conditions.
        not_before: DateTime<Utc>,
        /// `NotOnOrAfter` from the assertion conditions.
        not_on_or_after: DateTime<Utc>,
    },

    /// The audience restriction names someone else.
    #[error("audience is invalid. Expected: {expected}")]
    AudienceMismatch {
        /// The configured audience.
        expected: String,
        /// The audience found in the assertion.
        actual: String,
    },

    /// A required element or attribute is absent or unreadable.
    #[error("malformed assertion: {0}")]
    MalformedAssertion(String),

    /// The trust configuration cannot establish trust.
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl ValidationError {
    /// Returns the kind of this error, for programmatic matching.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SignatureMissing => ErrorKind::SignatureMissing,
            Self::SignatureInvalid(_) => ErrorKind::SignatureInvalid,
            Self::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::AudienceMismatch { .. } => ErrorKind::AudienceMismatch,
            Self::MalformedAssertion(_) => ErrorKind::MalformedAssertion,
            Self::ConfigurationError(_) => ErrorKind::ConfigurationError,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedAssertion(message.into())
    }

    pub(crate) fn invalid_signature(message: impl Into<String>) -> Self {
        Self::SignatureInvalid(message.into())
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }
}

/// The kind of a [`ValidationError`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ValidationError::SignatureMissing`].
    SignatureMissing,
    /// See [`ValidationError::SignatureInvalid`].
    SignatureInvalid,
    /// See [`ValidationError::UnsupportedVersion`].
    UnsupportedVersion,
    /// See [`ValidationError::Expired`].
    Expired,
    /// See [`ValidationError::AudienceMismatch`].
    AudienceMismatch,
    /// See [`ValidationError::MalformedAssertion`].
    MalformedAssertion,
    /// See [`ValidationError::ConfigurationError`].
    ConfigurationError,
}

impl ErrorKind {
    /// Returns a stable snake_case name, suitable for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignatureMissing => "signature_missing",
            Self::SignatureInvalid => "signature_invalid",
            Self::UnsupportedVersion => "unsupported_version",
            Self::Expired => "expired",
            Self::AudienceMismatch => "audience_mismatch",
            Self::MalformedAssertion => "malformed_assertion",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<quick_xml::Error> for ValidationError {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedAssertion(format!("XML parsing error: {err}"))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ValidationError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedAssertion(format!("XML attribute error: {err}"))
    }
}

impl From<toml::de::Error> for ValidationError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigurationError(format!("invalid trust configuration: {err}"))
    }
}
