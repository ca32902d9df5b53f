//! Validity window check.

use chrono::{DateTime, Duration, Utc};

use crate::error::{ValidationError, ValidationResult};
use crate::types::Conditions;

/// Clock skew tolerated on both ends of the validity window, in seconds.
pub const CLOCK_SKEW_SECS: i64 = 10 * 60;

/// Checks `now` against `[NotBefore - skew, NotOnOrAfter + skew]`.
///
/// Both bounds are inclusive.
///
/// # Errors
///
/// Returns [`ValidationError::Expired`] if `now` is outside the window.
pub fn check_validity(conditions: &Conditions, now: DateTime<Utc>) -> ValidationResult<()> {
    let skew = Duration::seconds(CLOCK_SKEW_SECS);
    let earliest = conditions
        .not_before
        .checked_sub_signed(skew)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let latest = conditions
        .not_on_or_after
        .checked_add_signed(skew)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    if now < earliest || now > latest {
        tracing::debug!(%now, %earliest, %latest, "assertion outside validity window");
        return Err(ValidationError::Expired {
            not_before: conditions.not_before,
            not_on_or_after: conditions.not_on_or_after,
        });
    }
    Ok(())
}
