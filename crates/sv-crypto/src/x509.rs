//! X.509 certificate handling.
//!
//! Only what signature trust needs is kept: the raw DER (for thumbprints)
//! and the subject public key. Chain building and revocation are left to
//! the caller.

use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey as ParsedKey;

use crate::algorithm::KeyAlgorithm;
use crate::hash;
use crate::signature::CryptoError;

/// Uncompressed SEC1 point length for P-256.
const P256_POINT_LEN: usize = 65;
/// Uncompressed SEC1 point length for P-384.
const P384_POINT_LEN: usize = 97;

/// A subject public key extracted from a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Returns the key family.
    #[must_use]
    pub const fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the key bytes: a PKCS#1 `RSAPublicKey` for RSA, an
    /// uncompressed point for EC.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A parsed signing certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    public_key: PublicKey,
}

impl Certificate {
    /// Parses a DER-encoded certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a certificate or carry a key
    /// type that cannot sign assertions.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|e| CryptoError::InvalidCertificate(format!("failed to parse: {e}")))?;

        let spki = cert.public_key();
        let key_bytes = spki.subject_public_key.data.to_vec();
        let algorithm = match spki.parsed() {
            Ok(ParsedKey::RSA(_)) => KeyAlgorithm::Rsa,
            Ok(ParsedKey::EC(_)) => match key_bytes.len() {
                P256_POINT_LEN => KeyAlgorithm::EcP256,
                P384_POINT_LEN => KeyAlgorithm::EcP384,
                len => {
                    return Err(CryptoError::InvalidKey(format!(
                        "unsupported EC point length {len}"
                    )))
                }
            },
            Ok(_) => {
                return Err(CryptoError::UnsupportedAlgorithm(
                    spki.algorithm.algorithm.to_id_string(),
                ))
            }
            Err(e) => return Err(CryptoError::InvalidKey(e.to_string())),
        };

        Ok(Self {
            der: der.to_vec(),
            subject: cert.subject().to_string(),
            public_key: PublicKey {
                algorithm,
                bytes: key_bytes,
            },
        })
    }

    /// Parses a PEM-encoded certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM block is malformed, is not labelled
    /// `CERTIFICATE`, or does not contain a valid certificate.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let (_, block) = parse_x509_pem(pem.as_bytes())
            .map_err(|e| CryptoError::InvalidCertificate(format!("invalid PEM: {e}")))?;

        if block.label != "CERTIFICATE" {
            return Err(CryptoError::InvalidCertificate(format!(
                "unexpected PEM label {}",
                block.label
            )));
        }

        Self::from_der(&block.contents)
    }

    /// Returns the DER encoding.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Returns the subject distinguished name.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the subject public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the uppercase hex SHA-1 thumbprint.
    #[must_use]
    pub fn thumbprint(&self) -> String {
        hash::thumbprint(&self.der)
    }
}
