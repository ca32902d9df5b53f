//! Hash functions and certificate thumbprints.

use aws_lc_rs::digest;

use crate::algorithm::DigestAlgorithm;

/// Computes a digest of the input data.
#[must_use]
pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    let alg = match algorithm {
        DigestAlgorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
        DigestAlgorithm::Sha256 => &digest::SHA256,
        DigestAlgorithm::Sha384 => &digest::SHA384,
        DigestAlgorithm::Sha512 => &digest::SHA512,
    };

    digest::digest(alg, data).as_ref().to_vec()
}

/// Computes a SHA-1 hash of the input data.
#[must_use]
pub fn sha1(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha1, data)
}

/// Computes a SHA-256 hash of the input data.
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha256, data)
}

/// Computes the thumbprint of a DER-encoded certificate.
///
/// The thumbprint is the SHA-1 digest of the DER bytes rendered as
/// uppercase hex, the form Windows certificate stores and ADFS display.
#[must_use]
pub fn thumbprint(der: &[u8]) -> String {
    hex::encode_upper(sha1(der))
}

/// Normalizes a configured thumbprint for comparison.
///
/// Operators copy thumbprints from tools that insert colons or spaces
/// between byte pairs, so separators are dropped and hex is uppercased.
#[must_use]
pub fn normalize_thumbprint(thumbprint: &str) -> String {
    thumbprint
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
