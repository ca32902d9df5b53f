//! Namespace and algorithm URIs, and their mapping to typed algorithms.

use sv_crypto::{DigestAlgorithm, SignatureAlgorithm};

use crate::error::DsigError;

/// XML Digital Signature namespace URI.
pub const DSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Exclusive canonicalization namespace (for `InclusiveNamespaces`).
pub const EXC_C14N_NS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// The namespace bound to the `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Canonical XML 1.0.
pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";
/// Canonical XML 1.0 with comments.
pub const C14N_WITH_COMMENTS: &str =
    "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments";
/// Exclusive Canonical XML 1.0.
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
/// Exclusive Canonical XML 1.0 with comments.
pub const EXC_C14N_WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

/// Enveloped signature transform.
pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";

/// Digest method URIs.
pub mod digest {
    /// SHA-1.
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
    /// SHA-256.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
    /// SHA-384.
    pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
    /// SHA-512.
    pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
}

/// Signature method URIs.
pub mod signature {
    /// RSA-SHA1.
    pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
    /// RSA-SHA256.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
    /// RSA-SHA384.
    pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";
    /// RSA-SHA512.
    pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";
    /// ECDSA-SHA256.
    pub const ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";
    /// ECDSA-SHA384.
    pub const ECDSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384";
}

/// The canonicalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum C14nMode {
    /// Canonical XML 1.0.
    Inclusive,
    /// Canonical XML 1.0 with comments.
    InclusiveWithComments,
    /// Exclusive Canonical XML 1.0.
    #[default]
    Exclusive,
    /// Exclusive Canonical XML 1.0 with comments.
    ExclusiveWithComments,
}

impl C14nMode {
    /// Parses a canonicalization mode from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            C14N => Some(Self::Inclusive),
            C14N_WITH_COMMENTS => Some(Self::InclusiveWithComments),
            EXC_C14N => Some(Self::Exclusive),
            EXC_C14N_WITH_COMMENTS => Some(Self::ExclusiveWithComments),
            _ => None,
        }
    }

    /// Returns true if comments are preserved.
    #[must_use]
    pub const fn with_comments(self) -> bool {
        matches!(self, Self::InclusiveWithComments | Self::ExclusiveWithComments)
    }

    /// Returns true for the exclusive variants.
    #[must_use]
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Exclusive | Self::ExclusiveWithComments)
    }
}

/// Maps a `DigestMethod` URI to a digest algorithm.
///
/// # Errors
///
/// Returns [`DsigError::UnsupportedAlgorithm`] for unknown URIs.
pub fn digest_from_uri(uri: &str) -> Result<DigestAlgorithm, DsigError> {
    match uri {
        digest::SHA1 => Ok(DigestAlgorithm::Sha1),
        digest::SHA256 => Ok(DigestAlgorithm::Sha256),
        digest::SHA384 => Ok(DigestAlgorithm::Sha384),
        digest::SHA512 => Ok(DigestAlgorithm::Sha512),
        _ => Err(DsigError::UnsupportedAlgorithm(format!("digest: {uri}"))),
    }
}

/// Maps a `SignatureMethod` URI to a signature algorithm.
///
/// # Errors
///
/// Returns [`DsigError::UnsupportedAlgorithm`] for unknown URIs.
pub fn signature_from_uri(uri: &str) -> Result<SignatureAlgorithm, DsigError> {
    match uri {
        signature::RSA_SHA1 => Ok(SignatureAlgorithm::RsaSha1),
        signature::RSA_SHA256 => Ok(SignatureAlgorithm::RsaSha256),
        signature::RSA_SHA384 => Ok(SignatureAlgorithm::RsaSha384),
        signature::RSA_SHA512 => Ok(SignatureAlgorithm::RsaSha512),
        signature::ECDSA_SHA256 => Ok(SignatureAlgorithm::EcdsaSha256),
        signature::ECDSA_SHA384 => Ok(SignatureAlgorithm::EcdsaSha384),
        _ => Err(DsigError::UnsupportedAlgorithm(format!("signature: {uri}"))),
    }
}
