//! XML-DSig error types.

use thiserror::Error;

/// Result type for XML-DSig operations.
pub type DsigResult<T> = Result<T, DsigError>;

/// Errors raised while processing a signature.
///
/// A signature that is well formed but does not verify is not an error; it
/// is reported as [`crate::VerifyOutcome::Invalid`].
#[derive(Debug, Error)]
pub enum DsigError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Missing required element.
    #[error("missing required element: {0}")]
    MissingElement(&'static str),

    /// Missing required attribute.
    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// Unknown or unsupported algorithm URI.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The reference URI cannot be resolved unambiguously.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64(String),

    /// Cryptographic error.
    #[error("crypto error: {0}")]
    Crypto(#[from] sv_crypto::CryptoError),
}

impl From<roxmltree::Error> for DsigError {
    fn from(err: roxmltree::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for DsigError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64(err.to_string())
    }
}
