//! # sv-xmldsig
//!
//! Verification of enveloped XML Digital Signatures, the way SAML
//! identity providers sign assertions.
//!
//! The crate works on a [`roxmltree::Document`] parsed from the literal
//! assertion text, so canonicalization sees the document exactly as it was
//! signed. Supported:
//!
//! - Canonical XML 1.0 and Exclusive Canonical XML 1.0, with and without
//!   comments
//! - the enveloped-signature transform
//! - SHA-1 and SHA-2 digests, RSA and ECDSA signature methods
//!
//! Key selection and trust are the caller's business: [`verify`] checks a
//! signature against whatever key it is handed.
//!
//! # Example
//!
//! ```rust,ignore
//! let doc = sv_xmldsig::parse(xml)?;
//! let signature = sv_xmldsig::find_signature(&doc).ok_or(MissingSignature)?;
//! let outcome = sv_xmldsig::verify(signature, cert.public_key(), &["AssertionID", "ID"])?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod algorithm;
pub mod c14n;
pub mod dom;
pub mod error;
pub mod verify;

pub use algorithm::C14nMode;
pub use c14n::canonicalize;
pub use dom::{embedded_certificate, find_signature, parse};
pub use error::{DsigError, DsigResult};
pub use verify::{verify, Reference, SignedInfo, Transform, VerifyOutcome};
