//! Common test utilities and fixtures.
//!
//! [`Idp`] plays the identity provider: it holds a signing certificate and
//! signs assertions the way a real IdP does, with an enveloped signature
//! over exclusive C14N. [`Idp::new`] mints a throwaway ECDSA P-256 identity;
//! [`Idp::rsa`] loads an RSA-2048 identity from `fixtures/`.

use std::fmt::Write as _;

use anyhow::Context;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{EcdsaKeyPair, RsaKeyPair, ECDSA_P256_SHA256_FIXED_SIGNING, RSA_PKCS1_SHA256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use sv_xmldsig::algorithm::{digest, signature, DSIG_NS, ENVELOPED_SIGNATURE, EXC_C14N};
use sv_xmldsig::{C14nMode, SignedInfo};

/// Audience every fixture assertion is issued for.
pub const AUDIENCE: &str = "urn:relying-party";

/// Installs a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fixed reference time for fixtures.
pub fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

/// Decodes the body of a single-block PEM file.
pub fn pem_contents(pem: &str) -> anyhow::Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    Ok(BASE64.decode(body)?)
}

enum SigningKey {
    Ecdsa(EcdsaKeyPair),
    Rsa(RsaKeyPair),
}

/// A test identity provider with its own signing certificate.
pub struct Idp {
    cert_der: Vec<u8>,
    cert_pem: String,
    key: SigningKey,
}

impl Idp {
    /// Creates an IdP with a fresh self-signed ECDSA P-256 certificate.
    pub fn new() -> anyhow::Result<Self> {
        let key_pair = rcgen::KeyPair::generate()?;
        let cert = rcgen::CertificateParams::new(vec!["idp.example.test".to_string()])?
            .self_signed(&key_pair)?;
        let key = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &key_pair.serialize_der())
            .map_err(|e| anyhow::anyhow!("signing key: {e}"))?;

        Ok(Self {
            cert_der: cert.der().to_vec(),
            cert_pem: cert.pem(),
            key: SigningKey::Ecdsa(key),
        })
    }

    /// The RSA-2048 IdP whose certificate and key live in `fixtures/`.
    pub fn rsa() -> anyhow::Result<Self> {
        Self::from_rsa_pem(
            include_str!("fixtures/idp-rsa-cert.pem"),
            include_str!("fixtures/idp-rsa-key.pem"),
        )
    }

    /// A second RSA-2048 IdP, unrelated to [`Idp::rsa`].
    pub fn other_rsa() -> anyhow::Result<Self> {
        Self::from_rsa_pem(
            include_str!("fixtures/other-rsa-cert.pem"),
            include_str!("fixtures/other-rsa-key.pem"),
        )
    }

    fn from_rsa_pem(cert_pem: &str, key_pem: &str) -> anyhow::Result<Self> {
        let key = RsaKeyPair::from_pkcs8(&pem_contents(key_pem)?)
            .map_err(|e| anyhow::anyhow!("signing key: {e}"))?;
        Ok(Self {
            cert_der: pem_contents(cert_pem)?,
            cert_pem: cert_pem.to_string(),
            key: SigningKey::Rsa(key),
        })
    }

    /// The `SignatureMethod` URI this IdP signs with.
    pub fn signature_method(&self) -> &'static str {
        match self.key {
            SigningKey::Ecdsa(_) => signature::ECDSA_SHA256,
            SigningKey::Rsa(_) => signature::RSA_SHA256,
        }
    }

    /// The certificate as PEM.
    pub fn certificate_pem(&self) -> &str {
        &self.cert_pem
    }

    /// The certificate as a bare base64 DER body, as IdP metadata carries it.
    pub fn certificate_body(&self) -> String {
        BASE64.encode(&self.cert_der)
    }

    /// SHA-1 thumbprint of the certificate, uppercase hex.
    pub fn thumbprint(&self) -> String {
        sv_crypto::thumbprint(&self.cert_der)
    }

    /// Signs an assertion produced by `builder`, optionally embedding the
    /// certificate in `KeyInfo`.
    pub fn sign(&self, builder: &AssertionBuilder, embed_certificate: bool) -> anyhow::Result<String> {
        let key_info = if embed_certificate {
            format!(
                "<ds:KeyInfo><ds:X509Data><ds:X509Certificate>{}</ds:X509Certificate></ds:X509Data></ds:KeyInfo>",
                self.certificate_body()
            )
        } else {
            String::new()
        };
        self.sign_xml(&builder.build(&signature_template(&builder.id, self.signature_method(), &key_info)))
    }

    /// Fills in `DigestValue` and `SignatureValue` of a document that
    /// carries an empty enveloped signature template.
    pub fn sign_xml(&self, xml: &str) -> anyhow::Result<String> {
        let digest = {
            let doc = sv_xmldsig::parse(xml)?;
            let sig = sv_xmldsig::find_signature(&doc).context("no signature template")?;
            let method = SignedInfo::parse(sig)?
                .references
                .first()
                .context("no reference")?
                .digest_method;
            let bytes = sv_xmldsig::canonicalize(doc.root_element(), C14nMode::Exclusive, Some(sig.id()), &[]);
            BASE64.encode(sv_crypto::digest(method, &bytes))
        };
        let xml = xml.replacen(
            "<ds:DigestValue></ds:DigestValue>",
            &format!("<ds:DigestValue>{digest}</ds:DigestValue>"),
            1,
        );

        let signature_value = {
            let doc = sv_xmldsig::parse(&xml)?;
            let sig = sv_xmldsig::find_signature(&doc).context("no signature template")?;
            let signed_info = SignedInfo::parse(sig)?;
            BASE64.encode(self.sign_bytes(&signed_info.canonical_bytes())?)
        };
        Ok(xml.replacen(
            "<ds:SignatureValue></ds:SignatureValue>",
            &format!("<ds:SignatureValue>{signature_value}</ds:SignatureValue>"),
            1,
        ))
    }

    fn sign_bytes(&self, data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let rng = SystemRandom::new();
        match &self.key {
            SigningKey::Ecdsa(key) => {
                let sig = key.sign(&rng, data).map_err(|e| anyhow::anyhow!("signing: {e}"))?;
                Ok(sig.as_ref().to_vec())
            }
            SigningKey::Rsa(key) => {
                let mut sig = vec![0; key.public_modulus_len()];
                key.sign(&RSA_PKCS1_SHA256, &rng, data, &mut sig)
                    .map_err(|e| anyhow::anyhow!("signing: {e}"))?;
                Ok(sig)
            }
        }
    }
}

/// An unsigned `ds:Signature` referencing `#id`, digested with SHA-256.
pub fn signature_template(id: &str, signature_method: &str, key_info: &str) -> String {
    format!(
        concat!(
            r#"<ds:Signature xmlns:ds="{dsig}"><ds:SignedInfo>"#,
            r#"<ds:CanonicalizationMethod Algorithm="{c14n}"/>"#,
            r#"<ds:SignatureMethod Algorithm="{sig}"/>"#,
            r##"<ds:Reference URI="#{id}"><ds:Transforms>"##,
            r#"<ds:Transform Algorithm="{enveloped}"/><ds:Transform Algorithm="{c14n}"/>"#,
            r#"</ds:Transforms><ds:DigestMethod Algorithm="{digest}"/>"#,
            r#"<ds:DigestValue></ds:DigestValue></ds:Reference></ds:SignedInfo>"#,
            r#"<ds:SignatureValue></ds:SignatureValue>{key_info}</ds:Signature>"#,
        ),
        dsig = DSIG_NS,
        c14n = EXC_C14N,
        sig = signature_method,
        enveloped = ENVELOPED_SIGNATURE,
        digest = digest::SHA256,
        id = id,
        key_info = key_info,
    )
}

/// Which assertion schema a builder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// SAML 1.1.
    Saml11,
    /// SAML 2.0.
    Saml20,
}

/// Builds assertion XML around a signature placeholder.
#[derive(Debug, Clone)]
pub struct AssertionBuilder {
    pub schema: Schema,
    pub id: String,
    pub version_attributes: String,
    pub not_before: Option<DateTime<Utc>>,
    pub not_on_or_after: Option<DateTime<Utc>>,
    pub audience: String,
    pub name_id: Option<String>,
    pub attributes: Vec<(String, Vec<String>)>,
}

impl AssertionBuilder {
    /// A SAML 2.0 assertion valid for an hour from [`issued_at`].
    pub fn saml20() -> Self {
        Self {
            schema: Schema::Saml20,
            id: "_a75adf55-01d7-40cc-929f-dbd8372ebdfc".to_string(),
            version_attributes: r#"Version="2.0""#.to_string(),
            not_before: Some(issued_at()),
            not_on_or_after: Some(issued_at() + Duration::hours(1)),
            audience: AUDIENCE.to_string(),
            name_id: Some("alice".to_string()),
            attributes: Vec::new(),
        }
    }

    /// A SAML 1.1 assertion valid for an hour from [`issued_at`].
    pub fn saml11() -> Self {
        Self {
            schema: Schema::Saml11,
            id: "_3b4f7e1c9d2a".to_string(),
            version_attributes: r#"MajorVersion="1" MinorVersion="1""#.to_string(),
            ..Self::saml20()
        }
    }

    /// Adds an attribute. For SAML 1.1 the name is `namespace/name`.
    pub fn attribute(mut self, name: &str, values: &[&str]) -> Self {
        self.attributes
            .push((name.to_string(), values.iter().map(ToString::to_string).collect()));
        self
    }

    /// Sets the audience.
    pub fn audience(mut self, audience: &str) -> Self {
        self.audience = audience.to_string();
        self
    }

    /// Renders the assertion with `signature` as the first child.
    pub fn build(&self, signature: &str) -> String {
        match self.schema {
            Schema::Saml20 => self.build_saml20(signature),
            Schema::Saml11 => self.build_saml11(signature),
        }
    }

    fn conditions_attributes(&self) -> String {
        let mut out = String::new();
        if let Some(t) = self.not_before {
            let _ = write!(out, r#" NotBefore="{}""#, t.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        if let Some(t) = self.not_on_or_after {
            let _ = write!(out, r#" NotOnOrAfter="{}""#, t.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        out
    }

    fn build_saml20(&self, signature: &str) -> String {
        let mut attributes = String::new();
        for (name, values) in &self.attributes {
            let _ = write!(attributes, r#"<saml:Attribute Name="{name}">"#);
            for value in values {
                let _ = write!(attributes, "<saml:AttributeValue>{value}</saml:AttributeValue>");
            }
            attributes.push_str("</saml:Attribute>");
        }
        let name_id = self
            .name_id
            .as_ref()
            .map(|n| format!("<saml:NameID>{n}</saml:NameID>"))
            .unwrap_or_default();

        format!(
            concat!(
                r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" {version} ID="{id}" IssueInstant="{instant}">"#,
                "<saml:Issuer>https://idp.example.test</saml:Issuer>{signature}",
                "<saml:Subject>{name_id}</saml:Subject>",
                "<saml:Conditions{conditions}><saml:AudienceRestriction><saml:Audience>{audience}</saml:Audience></saml:AudienceRestriction></saml:Conditions>",
                "<saml:AttributeStatement>{attributes}</saml:AttributeStatement>",
                "</saml:Assertion>",
            ),
            version = self.version_attributes,
            id = self.id,
            instant = issued_at().to_rfc3339_opts(SecondsFormat::Secs, true),
            signature = signature,
            name_id = name_id,
            conditions = self.conditions_attributes(),
            audience = self.audience,
            attributes = attributes,
        )
    }

    fn build_saml11(&self, signature: &str) -> String {
        let mut attributes = String::new();
        for (name, values) in &self.attributes {
            let (namespace, local) = name.rsplit_once('/').unwrap_or(("", name.as_str()));
            let _ = write!(
                attributes,
                r#"<saml:Attribute AttributeNamespace="{namespace}" AttributeName="{local}">"#
            );
            for value in values {
                let _ = write!(attributes, "<saml:AttributeValue>{value}</saml:AttributeValue>");
            }
            attributes.push_str("</saml:Attribute>");
        }
        let name_id = self
            .name_id
            .as_ref()
            .map(|n| format!("<saml:NameIdentifier>{n}</saml:NameIdentifier>"))
            .unwrap_or_default();

        format!(
            concat!(
                r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:1.0:assertion" {version} AssertionID="{id}" Issuer="https://idp.example.test" IssueInstant="{instant}">"#,
                "<saml:Conditions{conditions}><saml:AudienceRestrictionCondition><saml:Audience>{audience}</saml:Audience></saml:AudienceRestrictionCondition></saml:Conditions>",
                "<saml:AttributeStatement><saml:Subject>{name_id}</saml:Subject>{attributes}</saml:AttributeStatement>",
                "{signature}</saml:Assertion>",
            ),
            version = self.version_attributes,
            id = self.id,
            instant = issued_at().to_rfc3339_opts(SecondsFormat::Secs, true),
            signature = signature,
            name_id = name_id,
            conditions = self.conditions_attributes(),
            audience = self.audience,
            attributes = attributes,
        )
    }
}
