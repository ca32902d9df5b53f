//! Assertion signature verification.
//!
//! Works on the literal assertion text, before any structural parse, so
//! canonicalization sees the document exactly as it was signed. The steps
//! are explicit:
//!
//! 1. locate the `ds:Signature` directly under the root
//! 2. [`resolve_key`]: choose the verification certificate
//! 3. verify digest and signature value with that certificate
//! 4. [`decide`]: accept or reject based on where the key came from

mod key;
mod pem;
mod trust;

pub use key::{resolve_key, KeySource, ResolvedKey};
pub use pem::to_pem;
pub use trust::decide;

use crate::config::TrustConfig;
use crate::error::{ValidationError, ValidationResult};
use crate::types::ID_ATTRIBUTES;

/// Verifies that the assertion is signed by trusted key material.
///
/// # Errors
///
/// Returns [`ValidationError::SignatureMissing`] if the root has no
/// signature child and [`ValidationError::SignatureInvalid`] if the
/// document cannot be read, the signature does not verify, or the key is
/// not trusted.
pub fn verify_signature(xml: &str, config: &TrustConfig) -> ValidationResult<()> {
    let doc = sv_xmldsig::parse(xml)
        .map_err(|e| ValidationError::invalid_signature(format!("unreadable document: {e}")))?;
    let signature = sv_xmldsig::find_signature(&doc).ok_or(ValidationError::SignatureMissing)?;

    let key = resolve_key(signature, config)?;
    let outcome = sv_xmldsig::verify(signature, key.certificate.public_key(), ID_ATTRIBUTES)
        .map_err(|e| ValidationError::invalid_signature(e.to_string()))?;

    decide(&outcome, &key, config)
}
