//! DOM helpers over roxmltree.

use roxmltree::{Document, Node, ParsingOptions};

use crate::algorithm::DSIG_NS;
use crate::error::DsigResult;

/// Parses XML text into a DOM.
///
/// Document type declarations are refused, so entity expansion can never
/// alter the signed content.
///
/// # Errors
///
/// Returns [`crate::DsigError::XmlParse`] on malformed input.
pub fn parse(xml: &str) -> DsigResult<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: false,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(xml, options)?)
}

/// Finds the signature enveloped by the document element.
///
/// Only a `ds:Signature` that is a direct child of the root counts; a
/// signature nested deeper signs something other than the assertion.
#[must_use]
pub fn find_signature<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    child_element(doc.root_element(), DSIG_NS, "Signature")
}

/// Returns the base64 body of the first certificate under `KeyInfo`, with
/// whitespace removed.
#[must_use]
pub fn embedded_certificate(signature: Node<'_, '_>) -> Option<String> {
    let key_info = child_element(signature, DSIG_NS, "KeyInfo")?;
    key_info
        .descendants()
        .find(|n| is_element(*n, DSIG_NS, "X509Certificate"))
        .and_then(|n| n.text())
        .map(|text| text.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|body| !body.is_empty())
}

/// Returns true if `node` is an element with the given namespace and local name.
#[must_use]
pub fn is_element(node: Node<'_, '_>, ns_uri: &str, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace().unwrap_or("") == ns_uri
}

/// Finds the first child element with the given namespace and local name.
#[must_use]
pub fn child_element<'a, 'input>(
    parent: Node<'a, 'input>,
    ns_uri: &str,
    local_name: &str,
) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| is_element(*n, ns_uri, local_name))
}

/// Collects all child elements with the given namespace and local name.
#[must_use]
pub fn child_elements<'a, 'input>(
    parent: Node<'a, 'input>,
    ns_uri: &str,
    local_name: &str,
) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| is_element(*n, ns_uri, local_name))
        .collect()
}

/// Returns the text content with all whitespace removed, for base64 values.
#[must_use]
pub fn compact_text(node: Node<'_, '_>) -> String {
    node.text()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
