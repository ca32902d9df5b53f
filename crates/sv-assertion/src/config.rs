//! Trust configuration.
//!
//! A [`TrustConfig`] names the key material an assertion must be signed
//! with and the audience it must be issued for. It can be built in code or
//! embedded in an application's TOML configuration:
//!
//! ```toml
//! audience = "urn:my-app"
//! thumbprint = "6D:8A:1E:55:F9:A5:D0:A6:D4:F0:E1:D2:8E:3F:9B:7C:0A:1B:2C:3D"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// SHA-1 thumbprint length in hex characters.
const THUMBPRINT_HEX_LEN: usize = 40;

/// Trust material and expected audience for one relying application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustConfig {
    /// Signing certificate, as PEM or as a bare base64 DER body.
    ///
    /// When set, this is the only key assertions are verified with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,

    /// SHA-1 thumbprint of the signing certificate, in hex.
    ///
    /// Used only when no certificate is configured; the assertion must then
    /// embed a certificate with this thumbprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbprint: Option<String>,

    /// The realm or entity identifier the assertion must be issued for.
    pub audience: String,
}

impl TrustConfig {
    /// Creates a configuration with the given audience and no trust material.
    #[must_use]
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            certificate: None,
            thumbprint: None,
            audience: audience.into(),
        }
    }

    /// Sets the trusted signing certificate.
    #[must_use]
    pub fn with_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    /// Sets the trusted certificate thumbprint.
    #[must_use]
    pub fn with_thumbprint(mut self, thumbprint: impl Into<String>) -> Self {
        self.thumbprint = Some(thumbprint.into());
        self
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConfigurationError`] if the text is not a
    /// valid configuration or fails [`check`](Self::check).
    pub fn from_toml_str(s: &str) -> ValidationResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Checks that the configuration can establish trust.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConfigurationError`] if neither a
    /// certificate nor a thumbprint is set, if the thumbprint is not a
    /// SHA-1 hex digest, or if the audience is empty.
    pub fn check(&self) -> ValidationResult<()> {
        if self.audience.is_empty() {
            return Err(ValidationError::configuration("expected audience is empty"));
        }

        match (self.trusted_certificate(), self.trusted_thumbprint()) {
            (None, None) => Err(ValidationError::configuration(
                "either a certificate or a thumbprint must be configured",
            )),
            (None, Some(thumbprint)) if !is_sha1_hex(&thumbprint) => Err(
                ValidationError::configuration("thumbprint is not a SHA-1 hex digest"),
            ),
            _ => Ok(()),
        }
    }

    /// The configured certificate, if set and not blank.
    pub(crate) fn trusted_certificate(&self) -> Option<&str> {
        self.certificate
            .as_deref()
            .map(str::trim)
            .filter(|cert| !cert.is_empty())
    }

    /// The configured thumbprint, normalized to uppercase hex without
    /// separators, if set and not blank.
    pub(crate) fn trusted_thumbprint(&self) -> Option<String> {
        self.thumbprint
            .as_deref()
            .map(sv_crypto::normalize_thumbprint)
            .filter(|thumbprint| !thumbprint.is_empty())
    }
}

fn is_sha1_hex(thumbprint: &str) -> bool {
    thumbprint.len() == THUMBPRINT_HEX_LEN && thumbprint.chars().all(|c| c.is_ascii_hexdigit())
}
