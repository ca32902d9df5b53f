//! Assertion data types.
//!
//! The typed values the pipeline extracts from an assertion and the
//! profile it hands back to the caller.

mod conditions;
mod constants;
mod profile;
mod version;

pub use conditions::*;
pub use constants::*;
pub use profile::*;
pub use version::*;
