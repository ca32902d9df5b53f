//! Signature verification.
//!
//! XML-DSig carries ECDSA signatures as the fixed-width `r || s`
//! concatenation, so the `_FIXED` verification algorithms are used rather
//! than the ASN.1 ones.

use aws_lc_rs::signature::{self, UnparsedPublicKey};
use thiserror::Error;

use crate::algorithm::SignatureAlgorithm;
use crate::x509::PublicKey;

/// Error type for crypto operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Invalid key format.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// The key cannot produce signatures of the requested algorithm.
    #[error("key type {key} cannot verify {algorithm:?} signatures")]
    KeyMismatch {
        /// The certificate's key family.
        key: &'static str,
        /// The signature algorithm requested.
        algorithm: SignatureAlgorithm,
    },

    /// Algorithm not supported.
    #[error("algorithm not supported: {0}")]
    UnsupportedAlgorithm(String),
}

/// Verifies a signature over `data` with the given public key.
///
/// Returns `Ok(false)` when the signature does not verify. Errors are
/// reserved for inputs that can never verify, such as an RSA signature
/// presented against an EC key.
///
/// # Errors
///
/// Returns [`CryptoError::KeyMismatch`] if the key family does not match
/// the signature algorithm.
pub fn verify(
    algorithm: SignatureAlgorithm,
    key: &PublicKey,
    data: &[u8],
    sig: &[u8],
) -> Result<bool, CryptoError> {
    if key.algorithm() != algorithm.key_algorithm() {
        return Err(CryptoError::KeyMismatch {
            key: key.algorithm().name(),
            algorithm,
        });
    }

    let verification_alg: &dyn signature::VerificationAlgorithm = match algorithm {
        SignatureAlgorithm::RsaSha1 => &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
        SignatureAlgorithm::RsaSha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        SignatureAlgorithm::RsaSha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        SignatureAlgorithm::RsaSha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        SignatureAlgorithm::EcdsaSha256 => &signature::ECDSA_P256_SHA256_FIXED,
        SignatureAlgorithm::EcdsaSha384 => &signature::ECDSA_P384_SHA384_FIXED,
    };

    let public_key = UnparsedPublicKey::new(verification_alg, key.as_bytes());

    match public_key.verify(data, sig) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
