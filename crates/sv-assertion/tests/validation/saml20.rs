//! SAML 2.0 assertion tests.

use chrono::Duration;
use sv_assertion::{validate_at, ClaimValue, ErrorKind, TrustConfig, NAME_IDENTIFIER_CLAIM};

use crate::common::{init_tracing, issued_at, signature_template, AssertionBuilder, Idp, AUDIENCE};

fn config(idp: &Idp) -> TrustConfig {
    TrustConfig::new(AUDIENCE).with_certificate(idp.certificate_body())
}

/// Tests that attributes and the name identifier are normalized into the profile.
#[test]
fn test_profile_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let idp = Idp::new()?;
    let assertion = idp.sign(
        &AssertionBuilder::saml20()
            .attribute("role", &["admin", "user"])
            .attribute("email", &["a@b.com"]),
        false,
    )?;

    let profile = validate_at(&assertion, &config(&idp), issued_at())?;

    assert_eq!(profile.len(), 3);
    assert_eq!(
        profile.get("role"),
        Some(&ClaimValue::Multiple(vec!["admin".into(), "user".into()]))
    );
    assert_eq!(profile.get("email"), Some(&ClaimValue::Single("a@b.com".into())));
    assert_eq!(profile.name_identifier(), Some("alice"));

    let json = serde_json::to_value(&profile)?;
    assert_eq!(
        json,
        serde_json::json!({
            "role": ["admin", "user"],
            "email": "a@b.com",
            (NAME_IDENTIFIER_CLAIM): "alice",
        })
    );
    Ok(())
}

/// Tests that an assertion without attributes yields just the name identifier.
#[test]
fn test_empty_attribute_statement() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let assertion = idp.sign(&AssertionBuilder::saml20(), false)?;

    let profile = validate_at(&assertion, &config(&idp), issued_at())?;
    assert_eq!(profile.len(), 1);
    assert_eq!(profile.name_identifier(), Some("alice"));
    Ok(())
}

/// Tests the upper end of the validity window, skew included.
#[test]
fn test_expiry_boundary() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let builder = AssertionBuilder::saml20();
    let not_on_or_after = builder.not_on_or_after.unwrap_or_else(issued_at);
    let assertion = idp.sign(&builder, false)?;
    let config = config(&idp);

    let boundary = not_on_or_after + Duration::minutes(10);
    validate_at(&assertion, &config, boundary)?;

    let err = validate_at(&assertion, &config, boundary + Duration::seconds(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);
    Ok(())
}

/// Tests the lower end of the validity window, skew included.
#[test]
fn test_not_yet_valid_boundary() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let assertion = idp.sign(&AssertionBuilder::saml20(), false)?;
    let config = config(&idp);

    let boundary = issued_at() - Duration::minutes(10);
    validate_at(&assertion, &config, boundary)?;

    let err = validate_at(&assertion, &config, boundary - Duration::seconds(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);
    Ok(())
}

/// Tests that the audience must match byte for byte.
#[test]
fn test_audience_mismatch() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let config = config(&idp);

    let other = idp.sign(&AssertionBuilder::saml20().audience("urn:someone-else"), false)?;
    let err = validate_at(&other, &config, issued_at()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AudienceMismatch);
    assert!(err.to_string().contains(AUDIENCE));

    let shouting = idp.sign(&AssertionBuilder::saml20().audience(&AUDIENCE.to_uppercase()), false)?;
    let err = validate_at(&shouting, &config, issued_at()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AudienceMismatch);
    Ok(())
}

/// Tests that a missing validity bound is malformed rather than expired.
#[test]
fn test_missing_not_before_is_malformed() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let mut builder = AssertionBuilder::saml20();
    builder.not_before = None;
    let assertion = idp.sign(&builder, false)?;

    let err = validate_at(&assertion, &config(&idp), issued_at()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAssertion);
    Ok(())
}

/// Tests that a validity bound without a time zone is malformed, even when
/// the signature over it is sound.
#[test]
fn test_zoneless_timestamp_is_malformed() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let builder = AssertionBuilder::saml20();
    let unsigned = builder.build(&signature_template(&builder.id, idp.signature_method(), ""));
    let zoneless = unsigned.replacen(
        r#"NotOnOrAfter="2024-05-01T11:00:00Z""#,
        r#"NotOnOrAfter="2024-05-01T11:00:00""#,
        1,
    );
    assert_ne!(unsigned, zoneless);
    let assertion = idp.sign_xml(&zoneless)?;

    let err = validate_at(&assertion, &config(&idp), issued_at()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAssertion);
    assert!(err.to_string().contains("NotOnOrAfter"), "{err}");
    Ok(())
}

/// Tests that an assertion without a name identifier still validates.
#[test]
fn test_subject_without_name_id() -> anyhow::Result<()> {
    let idp = Idp::new()?;
    let mut builder = AssertionBuilder::saml20().attribute("email", &["a@b.com"]);
    builder.name_id = None;
    let assertion = idp.sign(&builder, false)?;

    let profile = validate_at(&assertion, &config(&idp), issued_at())?;
    assert_eq!(profile.name_identifier(), None);
    assert_eq!(profile.len(), 1);
    Ok(())
}
