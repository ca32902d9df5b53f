//! Audience restriction check.

use crate::error::{ValidationError, ValidationResult};
use crate::types::Conditions;

/// Checks that the assertion is issued for `expected`.
///
/// The comparison is byte-exact; case and whitespace differences fail.
///
/// # Errors
///
/// Returns [`ValidationError::AudienceMismatch`] on any difference.
pub fn check_audience(conditions: &Conditions, expected: &str) -> ValidationResult<()> {
    if conditions.audience == expected {
        Ok(())
    } else {
        Err(ValidationError::AudienceMismatch {
            expected: expected.to_owned(),
            actual: conditions.audience.clone(),
        })
    }
}
