//! # sv-assertion
//!
//! Validation of signed SAML 1.1 and SAML 2.0 assertions presented as
//! bearer credentials.
//!
//! A single call takes the literal assertion text and a [`TrustConfig`]
//! and returns either an [`IdentityProfile`] or the first
//! [`ValidationError`] encountered. The pipeline runs, in order:
//!
//! 1. trust configuration check
//! 2. signature verification against the configured certificate or
//!    thumbprint ([`signature`])
//! 3. generic XML parse ([`xml`]) and version detection
//! 4. validity window check with a ten minute clock skew
//! 5. exact audience match
//! 6. attribute normalization ([`extract`])
//!
//! # Example
//!
//! ```rust,ignore
//! use sv_assertion::{validate, TrustConfig};
//!
//! let config = TrustConfig::new("urn:my-app")
//!     .with_thumbprint("6D8A1E55F9A5D0A6D4F0E1D28E3F9B7C0A1B2C3D");
//! let profile = validate(&assertion_xml, &config)?;
//! println!("user: {:?}", profile.name_identifier());
//! ```
//!
//! Nothing is cached between calls and no I/O is performed, so a
//! [`Validator`] can be shared freely across threads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extract;
pub mod signature;
pub mod types;
pub mod validate;
pub mod xml;

pub use config::TrustConfig;
pub use error::{ErrorKind, ValidationError, ValidationResult};
pub use types::*;
pub use validate::{validate, validate_at, Validator};
