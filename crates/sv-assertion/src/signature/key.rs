//! Signing key resolution.
//!
//! Picks the certificate an assertion is verified with and reports where
//! it came from. The thumbprint of an embedded certificate is returned
//! alongside the key so the trust decision can compare it afterwards.

use roxmltree::Node;
use sv_crypto::Certificate;

use crate::config::TrustConfig;
use crate::error::{ValidationError, ValidationResult};

use super::pem::{ensure_pem, to_pem};

/// Where a verification key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// The certificate in the trust configuration.
    Configured,
    /// A certificate embedded in the signature's `KeyInfo`.
    Embedded {
        /// SHA-1 thumbprint of the embedded certificate, uppercase hex.
        thumbprint: String,
    },
}

/// A verification key together with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    /// The certificate whose public key verifies the signature.
    pub certificate: Certificate,
    /// Where the certificate came from.
    pub source: KeySource,
}

/// Resolves the verification key for a signature.
///
/// A configured certificate is always used when present. Otherwise, with a
/// thumbprint configured, the certificate embedded in the signature is
/// used and its thumbprint computed for the trust decision.
///
/// # Errors
///
/// Returns [`ValidationError::SignatureInvalid`] if the key material
/// cannot be parsed or thumbprint trust finds no embedded certificate, and
/// [`ValidationError::ConfigurationError`] if no trust material is set.
pub fn resolve_key(signature: Node<'_, '_>, config: &TrustConfig) -> ValidationResult<ResolvedKey> {
    if let Some(configured) = config.trusted_certificate() {
        let certificate = Certificate::from_pem(&ensure_pem(configured)).map_err(|e| {
            ValidationError::invalid_signature(format!("configured certificate: {e}"))
        })?;
        tracing::debug!(subject = %certificate.subject(), "verifying with configured certificate");
        return Ok(ResolvedKey {
            certificate,
            source: KeySource::Configured,
        });
    }

    if config.trusted_thumbprint().is_none() {
        return Err(ValidationError::configuration(
            "either a certificate or a thumbprint must be configured",
        ));
    }

    let body = sv_xmldsig::embedded_certificate(signature).ok_or_else(|| {
        ValidationError::invalid_signature("no embedded certificate to match the thumbprint")
    })?;
    let certificate = Certificate::from_pem(&to_pem(&body))
        .map_err(|e| ValidationError::invalid_signature(format!("embedded certificate: {e}")))?;
    let thumbprint = certificate.thumbprint();
    tracing::debug!(
        subject = %certificate.subject(),
        thumbprint = %thumbprint,
        "verifying with embedded certificate"
    );

    Ok(ResolvedKey {
        certificate,
        source: KeySource::Embedded { thumbprint },
    })
}
