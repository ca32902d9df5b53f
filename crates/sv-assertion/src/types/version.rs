//! SAML version detection.

use std::fmt;

use crate::error::{ValidationError, ValidationResult};
use crate::xml::Element;

/// The schema an assertion follows.
///
/// Determined once from the root attributes and used for every later field
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionVersion {
    /// SAML 1.1 (`MajorVersion="1"`).
    V1_1,
    /// SAML 2.0 (`Version="2.0"`).
    V2_0,
}

impl AssertionVersion {
    /// Classifies an assertion by its root attributes.
    ///
    /// `MajorVersion="1"` is checked before `Version="2.0"`, so a root
    /// carrying both is treated as SAML 1.1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedVersion`] if neither matches.
    pub fn detect(root: &Element) -> ValidationResult<Self> {
        if root.attribute("MajorVersion") == Some("1") {
            Ok(Self::V1_1)
        } else if root.attribute("Version") == Some("2.0") {
            Ok(Self::V2_0)
        } else {
            Err(ValidationError::UnsupportedVersion)
        }
    }

    /// Returns the version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_1 => "1.1",
            Self::V2_0 => "2.0",
        }
    }
}

impl fmt::Display for AssertionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
