//! The validation pipeline.
//!
//! Configuration, signature, version, validity window, audience and
//! attributes are checked in that order. The first failure ends the call.

pub mod audience;
pub mod temporal;

use chrono::{DateTime, Utc};

use crate::config::TrustConfig;
use crate::error::ValidationResult;
use crate::types::{AssertionVersion, IdentityProfile};
use crate::{extract, signature, xml};

pub use audience::check_audience;
pub use temporal::{check_validity, CLOCK_SKEW_SECS};

/// Validates an assertion against the current time.
///
/// # Errors
///
/// Returns the first [`ValidationError`](crate::ValidationError) the
/// pipeline encounters.
pub fn validate(xml: &str, config: &TrustConfig) -> ValidationResult<IdentityProfile> {
    validate_at(xml, config, Utc::now())
}

/// Validates an assertion as of `now`.
///
/// # Errors
///
/// Returns the first [`ValidationError`](crate::ValidationError) the
/// pipeline encounters.
pub fn validate_at(
    xml: &str,
    config: &TrustConfig,
    now: DateTime<Utc>,
) -> ValidationResult<IdentityProfile> {
    let result = run(xml, config, now);
    if let Err(err) = &result {
        tracing::warn!(kind = %err.kind(), "SAML assertion rejected");
    }
    result
}

fn run(xml: &str, config: &TrustConfig, now: DateTime<Utc>) -> ValidationResult<IdentityProfile> {
    config.check()?;

    signature::verify_signature(xml, config)?;
    tracing::debug!("assertion signature trusted");

    let root = xml::parse(xml)?;
    let version = AssertionVersion::detect(&root)?;
    tracing::debug!(%version, "detected SAML version");

    let conditions = extract::conditions(&root, version)?;
    temporal::check_validity(&conditions, now)?;
    audience::check_audience(&conditions, &config.audience)?;

    let profile = extract::profile(&root, version)?;
    tracing::debug!(claims = profile.len(), "assertion accepted");
    Ok(profile)
}

/// A validator bound to one trust configuration.
///
/// Holds no state besides the configuration, so one instance can serve
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct Validator {
    config: TrustConfig,
}

impl Validator {
    /// Creates a validator for the given configuration.
    #[must_use]
    pub const fn new(config: TrustConfig) -> Self {
        Self { config }
    }

    /// Returns the trust configuration.
    pub const fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Validates an assertion against the current time.
    ///
    /// # Errors
    ///
    /// See [`validate`].
    pub fn validate(&self, xml: &str) -> ValidationResult<IdentityProfile> {
        validate(xml, &self.config)
    }

    /// Validates an assertion as of `now`.
    ///
    /// # Errors
    ///
    /// See [`validate_at`].
    pub fn validate_at(&self, xml: &str, now: DateTime<Utc>) -> ValidationResult<IdentityProfile> {
        validate_at(xml, &self.config, now)
    }
}
