//! # sv-crypto
//!
//! Cryptographic primitives used to validate signed SAML assertions, built
//! on aws-lc-rs and x509-parser.
//!
//! ## Legacy algorithms
//!
//! SAML 1.1 and many SAML 2.0 identity providers still sign with RSA-SHA1
//! and identify trusted certificates by their SHA-1 thumbprint. Both are
//! supported here for interoperability only; nothing in this crate produces
//! new SHA-1 signatures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod algorithm;
pub mod hash;
pub mod signature;
pub mod x509;

pub use algorithm::{DigestAlgorithm, KeyAlgorithm, SignatureAlgorithm};
pub use hash::{digest, normalize_thumbprint, sha1, sha256, thumbprint};
pub use signature::{verify, CryptoError};
pub use x509::{Certificate, PublicKey};
