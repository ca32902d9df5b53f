//! Enveloped signature verification.
//!
//! Processing order:
//! 1. Read `SignedInfo`: canonicalization method, signature method, references
//! 2. Resolve the single `Reference` to the element enveloping the signature
//! 3. Run its transforms, digest, compare with `DigestValue`
//! 4. Canonicalize `SignedInfo` and verify `SignatureValue` with the given key

use base64::Engine;
use roxmltree::{Document, Node, NodeId};
use sv_crypto::{DigestAlgorithm, PublicKey, SignatureAlgorithm};

use crate::algorithm::{self, C14nMode, DSIG_NS, EXC_C14N_NS};
use crate::c14n::canonicalize;
use crate::dom::{child_element, child_elements, compact_text, is_element};
use crate::error::{DsigError, DsigResult};

/// Result of signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Digest and signature value both check out against the supplied key.
    Valid,
    /// The signature does not verify.
    Invalid {
        /// Why verification failed.
        reason: String,
    },
}

impl VerifyOutcome {
    /// Returns true if the signature verified.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// A reference transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Removes the enveloping `Signature` from the node set.
    EnvelopedSignature,
    /// Canonicalizes the node set into octets.
    Canonicalize {
        /// The canonicalization variant.
        mode: C14nMode,
        /// Exclusive C14N `PrefixList`.
        inclusive_prefixes: Vec<String>,
    },
}

/// A parsed `ds:Reference`.
#[derive(Debug, Clone)]
pub struct Reference {
    /// The `URI` attribute (empty for the whole document).
    pub uri: String,
    /// Transforms in document order.
    pub transforms: Vec<Transform>,
    /// The digest algorithm.
    pub digest_method: DigestAlgorithm,
    /// The expected digest.
    pub digest_value: Vec<u8>,
}

/// A parsed `ds:SignedInfo`.
#[derive(Debug, Clone)]
pub struct SignedInfo<'a, 'input> {
    /// The `SignedInfo` element itself.
    pub node: Node<'a, 'input>,
    /// How `SignedInfo` is canonicalized before signing.
    pub canonicalization: C14nMode,
    /// `PrefixList` of the canonicalization method.
    pub inclusive_prefixes: Vec<String>,
    /// The signature algorithm.
    pub signature_method: SignatureAlgorithm,
    /// The references.
    pub references: Vec<Reference>,
}

impl<'a, 'input> SignedInfo<'a, 'input> {
    /// Reads `SignedInfo` from a `Signature` element.
    ///
    /// # Errors
    ///
    /// Returns an error if a required element or attribute is missing or an
    /// algorithm is not supported.
    pub fn parse(signature: Node<'a, 'input>) -> DsigResult<Self> {
        let node = child_element(signature, DSIG_NS, "SignedInfo")
            .ok_or(DsigError::MissingElement("SignedInfo"))?;

        let c14n_node = child_element(node, DSIG_NS, "CanonicalizationMethod")
            .ok_or(DsigError::MissingElement("CanonicalizationMethod"))?;
        let c14n_uri = c14n_node
            .attribute("Algorithm")
            .ok_or(DsigError::MissingAttribute("CanonicalizationMethod/@Algorithm"))?;
        let canonicalization = C14nMode::from_uri(c14n_uri)
            .ok_or_else(|| DsigError::UnsupportedAlgorithm(format!("C14N: {c14n_uri}")))?;

        let sig_method_uri = child_element(node, DSIG_NS, "SignatureMethod")
            .ok_or(DsigError::MissingElement("SignatureMethod"))?
            .attribute("Algorithm")
            .ok_or(DsigError::MissingAttribute("SignatureMethod/@Algorithm"))?;
        let signature_method = algorithm::signature_from_uri(sig_method_uri)?;

        let references = child_elements(node, DSIG_NS, "Reference")
            .into_iter()
            .map(parse_reference)
            .collect::<DsigResult<Vec<_>>>()?;

        Ok(Self {
            node,
            canonicalization,
            inclusive_prefixes: read_inclusive_prefixes(c14n_node),
            signature_method,
            references,
        })
    }

    /// Canonicalizes `SignedInfo`, producing the bytes that were signed.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonicalize(
            self.node,
            self.canonicalization,
            None,
            &self.inclusive_prefixes,
        )
    }
}

/// Verifies an enveloped signature with the given key.
///
/// `id_attributes` names the attributes that carry element identifiers,
/// e.g. `AssertionID` for SAML 1.1 and `ID` for SAML 2.0.
///
/// The single reference must resolve to the element that directly contains
/// the signature; anything else would let a valid signature over one
/// element vouch for another.
///
/// # Errors
///
/// Returns an error if the signature is structurally malformed. A
/// well-formed signature that fails verification is
/// [`VerifyOutcome::Invalid`].
pub fn verify(
    signature: Node<'_, '_>,
    key: &PublicKey,
    id_attributes: &[&str],
) -> DsigResult<VerifyOutcome> {
    let signed_info = SignedInfo::parse(signature)?;

    let [reference] = signed_info.references.as_slice() else {
        return Ok(VerifyOutcome::invalid(format!(
            "expected exactly one Reference, found {}",
            signed_info.references.len()
        )));
    };

    let enveloping = signature
        .parent_element()
        .ok_or(DsigError::MissingElement("enveloping element"))?;
    let target = resolve_reference(signature.document(), &reference.uri, id_attributes)?;
    if target.id() != enveloping.id() {
        return Ok(VerifyOutcome::invalid(format!(
            "reference {} does not point at the signed element",
            reference.uri
        )));
    }

    let data = apply_transforms(target, signature.id(), &reference.transforms)?;
    let computed = sv_crypto::digest(reference.digest_method, &data);
    if computed != reference.digest_value {
        tracing::debug!(uri = %reference.uri, "reference digest mismatch");
        return Ok(VerifyOutcome::invalid("digest value mismatch"));
    }

    let sig_value_node = child_element(signature, DSIG_NS, "SignatureValue")
        .ok_or(DsigError::MissingElement("SignatureValue"))?;
    let sig_value = base64::engine::general_purpose::STANDARD.decode(compact_text(sig_value_node))?;

    let valid = sv_crypto::verify(
        signed_info.signature_method,
        key,
        &signed_info.canonical_bytes(),
        &sig_value,
    )?;

    if valid {
        let method = signed_info.signature_method;
        if method.is_deprecated() || reference.digest_method.is_deprecated() {
            tracing::warn!(
                signature_digest = method.digest().name(),
                reference_digest = reference.digest_method.name(),
                "accepted signature uses deprecated SHA-1"
            );
        }
        Ok(VerifyOutcome::Valid)
    } else {
        Ok(VerifyOutcome::invalid("signature value verification failed"))
    }
}

fn parse_reference(node: Node<'_, '_>) -> DsigResult<Reference> {
    let uri = node.attribute("URI").unwrap_or("").to_owned();

    let digest_uri = child_element(node, DSIG_NS, "DigestMethod")
        .ok_or(DsigError::MissingElement("DigestMethod"))?
        .attribute("Algorithm")
        .ok_or(DsigError::MissingAttribute("DigestMethod/@Algorithm"))?;
    let digest_method = algorithm::digest_from_uri(digest_uri)?;

    let digest_node = child_element(node, DSIG_NS, "DigestValue")
        .ok_or(DsigError::MissingElement("DigestValue"))?;
    let digest_value = base64::engine::general_purpose::STANDARD.decode(compact_text(digest_node))?;

    let mut transforms = Vec::new();
    if let Some(list) = child_element(node, DSIG_NS, "Transforms") {
        for transform in child_elements(list, DSIG_NS, "Transform") {
            let uri = transform
                .attribute("Algorithm")
                .ok_or(DsigError::MissingAttribute("Transform/@Algorithm"))?;
            transforms.push(parse_transform(uri, transform)?);
        }
    }

    Ok(Reference {
        uri,
        transforms,
        digest_method,
        digest_value,
    })
}

fn parse_transform(uri: &str, node: Node<'_, '_>) -> DsigResult<Transform> {
    if uri == algorithm::ENVELOPED_SIGNATURE {
        return Ok(Transform::EnvelopedSignature);
    }
    C14nMode::from_uri(uri)
        .map(|mode| Transform::Canonicalize {
            mode,
            inclusive_prefixes: read_inclusive_prefixes(node),
        })
        .ok_or_else(|| DsigError::UnsupportedAlgorithm(format!("transform: {uri}")))
}

/// Resolves a same-document reference to an element.
fn resolve_reference<'a, 'input>(
    doc: &'a Document<'input>,
    uri: &str,
    id_attributes: &[&str],
) -> DsigResult<Node<'a, 'input>> {
    if uri.is_empty() {
        return Ok(doc.root_element());
    }

    let id = uri
        .strip_prefix('#')
        .filter(|id| !id.is_empty() && !id.starts_with("xpointer("))
        .ok_or_else(|| DsigError::InvalidReference(format!("unsupported URI {uri}")))?;

    let mut matches = doc.descendants().filter(|n| {
        n.is_element()
            && id_attributes
                .iter()
                .any(|attr| n.attribute(*attr) == Some(id))
    });

    let target = matches
        .next()
        .ok_or_else(|| DsigError::InvalidReference(format!("no element with ID {id}")))?;
    if matches.next().is_some() {
        return Err(DsigError::InvalidReference(format!("duplicate ID {id}")));
    }
    Ok(target)
}

/// Runs the transform chain over the referenced subtree and returns octets.
///
/// A node set left uncanonicalized at the end of the chain is converted
/// with inclusive C14N, as XML-DSig requires.
fn apply_transforms(
    target: Node<'_, '_>,
    signature: NodeId,
    transforms: &[Transform],
) -> DsigResult<Vec<u8>> {
    let mut exclude = None;
    let mut octets = None;

    for transform in transforms {
        if octets.is_some() {
            return Err(DsigError::UnsupportedAlgorithm(
                "transform after canonicalization".into(),
            ));
        }
        match transform {
            Transform::EnvelopedSignature => exclude = Some(signature),
            Transform::Canonicalize {
                mode,
                inclusive_prefixes,
            } => {
                // Same-document references never carry comments into the digest.
                let mode = match mode {
                    C14nMode::InclusiveWithComments => C14nMode::Inclusive,
                    C14nMode::ExclusiveWithComments => C14nMode::Exclusive,
                    other => *other,
                };
                octets = Some(canonicalize(target, mode, exclude, inclusive_prefixes));
            }
        }
    }

    Ok(octets.unwrap_or_else(|| canonicalize(target, C14nMode::Inclusive, exclude, &[])))
}

fn read_inclusive_prefixes(method: Node<'_, '_>) -> Vec<String> {
    method
        .children()
        .find(|n| is_element(*n, EXC_C14N_NS, "InclusiveNamespaces"))
        .and_then(|n| n.attribute("PrefixList"))
        .map(|list| list.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}
