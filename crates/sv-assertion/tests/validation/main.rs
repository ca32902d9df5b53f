//! End-to-end validation tests.
//!
//! Assertions are signed by a test identity provider (see
//! [`common::Idp`]) and run through the public `validate_at` entry point
//! with a pinned clock.

mod common;
mod saml20;
