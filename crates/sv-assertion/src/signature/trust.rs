//! Trust decision.
//!
//! Runs after cryptographic verification. A signature made with a
//! configured certificate is trusted as soon as it verifies; one made with
//! an embedded certificate is trusted only if that certificate's
//! thumbprint is the configured one.

use sv_xmldsig::VerifyOutcome;

use crate::config::TrustConfig;
use crate::error::{ValidationError, ValidationResult};

use super::key::{KeySource, ResolvedKey};

/// Decides whether a verified signature is trusted.
///
/// # Errors
///
/// Returns [`ValidationError::SignatureInvalid`] if the signature did not
/// verify or the embedded certificate's thumbprint does not match.
pub fn decide(
    outcome: &VerifyOutcome,
    key: &ResolvedKey,
    config: &TrustConfig,
) -> ValidationResult<()> {
    if let VerifyOutcome::Invalid { reason } = outcome {
        return Err(ValidationError::invalid_signature(reason.clone()));
    }

    match &key.source {
        KeySource::Configured => Ok(()),
        KeySource::Embedded { thumbprint } => {
            let expected = config.trusted_thumbprint().ok_or_else(|| {
                ValidationError::configuration("embedded certificate used without a thumbprint")
            })?;
            if thumbprint.eq_ignore_ascii_case(&expected) {
                Ok(())
            } else {
                tracing::debug!(
                    expected = %expected,
                    actual = %thumbprint,
                    "embedded certificate thumbprint mismatch"
                );
                Err(ValidationError::invalid_signature(
                    "signing certificate thumbprint is not trusted",
                ))
            }
        }
    }
}
