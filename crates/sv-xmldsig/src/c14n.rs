//! XML canonicalization (Canonical XML 1.0 and Exclusive C14N 1.0).
//!
//! Canonicalization always runs over a document subset: the subtree rooted
//! at an apex element, optionally minus one excluded subtree (the enveloped
//! `Signature`). Exclusive C14N only renders namespace declarations that are
//! visibly utilized:
//!
//! 1. the prefix of the element name,
//! 2. prefixes of the element's attributes,
//! 3. prefixes named in the `InclusiveNamespaces` `PrefixList`.

use std::collections::{BTreeMap, BTreeSet};

use roxmltree::{Attribute, Node, NodeId};

use crate::algorithm::{C14nMode, XML_NS};

/// Canonicalizes the subtree rooted at `apex`.
///
/// `exclude` removes one subtree from the output. `inclusive_prefixes` is the
/// exclusive C14N `PrefixList` (`#default` names the default namespace) and
/// is ignored by inclusive modes.
#[must_use]
pub fn canonicalize(
    apex: Node<'_, '_>,
    mode: C14nMode,
    exclude: Option<NodeId>,
    inclusive_prefixes: &[String],
) -> Vec<u8> {
    let inclusive_prefixes = inclusive_prefixes
        .iter()
        .map(|p| if p == "#default" { String::new() } else { p.clone() })
        .collect();

    let mut c14n = Canonicalizer {
        mode,
        exclude,
        inclusive_prefixes,
        output: Vec::new(),
    };
    c14n.node(apex, &BTreeMap::new());
    c14n.output
}

struct Canonicalizer {
    mode: C14nMode,
    exclude: Option<NodeId>,
    inclusive_prefixes: BTreeSet<String>,
    output: Vec<u8>,
}

impl Canonicalizer {
    fn node(&mut self, node: Node<'_, '_>, rendered_ns: &BTreeMap<String, String>) {
        if Some(node.id()) == self.exclude {
            return;
        }

        if node.is_element() {
            self.element(node, rendered_ns);
        } else if node.is_text() {
            let text = node.text().unwrap_or("");
            self.output.extend_from_slice(escape_text(text).as_bytes());
        } else if node.is_comment() {
            if self.mode.with_comments() {
                self.output.extend_from_slice(b"<!--");
                self.output
                    .extend_from_slice(node.text().unwrap_or("").as_bytes());
                self.output.extend_from_slice(b"-->");
            }
        } else if let Some(pi) = node.pi() {
            self.output.extend_from_slice(b"<?");
            self.output.extend_from_slice(pi.target.as_bytes());
            if let Some(value) = pi.value.filter(|v| !v.is_empty()) {
                self.output.push(b' ');
                self.output.extend_from_slice(value.as_bytes());
            }
            self.output.extend_from_slice(b"?>");
        }
    }

    fn element(&mut self, node: Node<'_, '_>, rendered_ns: &BTreeMap<String, String>) {
        let name = element_qname(node);
        let in_scope = in_scope_namespaces(node);

        let ns_decls = if self.mode.is_exclusive() {
            self.utilized_declarations(node, &name, &in_scope, rendered_ns)
        } else {
            inclusive_declarations(&in_scope, rendered_ns)
        };

        let mut attrs: Vec<(String, String, String, String)> = node
            .attributes()
            .map(|attr| {
                let ns_uri = attr.namespace().unwrap_or("").to_owned();
                let qname = attribute_qname(node, &attr);
                (ns_uri, attr.name().to_owned(), qname, attr.value().to_owned())
            })
            .collect();
        attrs.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        self.output.push(b'<');
        self.output.extend_from_slice(name.as_bytes());
        for (prefix, uri) in &ns_decls {
            if prefix.is_empty() {
                self.output.extend_from_slice(b" xmlns=\"");
            } else {
                self.output.extend_from_slice(b" xmlns:");
                self.output.extend_from_slice(prefix.as_bytes());
                self.output.extend_from_slice(b"=\"");
            }
            self.output.extend_from_slice(escape_attr(uri).as_bytes());
            self.output.push(b'"');
        }
        for (_, _, qname, value) in &attrs {
            self.output.push(b' ');
            self.output.extend_from_slice(qname.as_bytes());
            self.output.extend_from_slice(b"=\"");
            self.output.extend_from_slice(escape_attr(value).as_bytes());
            self.output.push(b'"');
        }
        self.output.push(b'>');

        let mut child_rendered = rendered_ns.clone();
        child_rendered.extend(ns_decls);

        for child in node.children() {
            self.node(child, &child_rendered);
        }

        self.output.extend_from_slice(b"</");
        self.output.extend_from_slice(name.as_bytes());
        self.output.push(b'>');
    }

    fn utilized_declarations(
        &self,
        node: Node<'_, '_>,
        name: &str,
        in_scope: &BTreeMap<String, String>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut utilized: BTreeSet<String> = self.inclusive_prefixes.clone();
        utilized.insert(prefix_of(name).to_owned());
        for attr in node.attributes() {
            if attr.namespace().is_some() {
                let qname = attribute_qname(node, &attr);
                let prefix = prefix_of(&qname);
                if !prefix.is_empty() {
                    utilized.insert(prefix.to_owned());
                }
            }
        }

        let mut decls = BTreeMap::new();
        for prefix in utilized {
            if prefix == "xml" {
                continue;
            }
            match in_scope.get(&prefix) {
                Some(uri) if rendered_ns.get(&prefix) != Some(uri) => {
                    decls.insert(prefix, uri.clone());
                }
                None if prefix.is_empty() && rendered_ns.get("").is_some_and(|u| !u.is_empty()) => {
                    decls.insert(prefix, String::new());
                }
                _ => {}
            }
        }
        decls
    }
}

fn inclusive_declarations(
    in_scope: &BTreeMap<String, String>,
    rendered_ns: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut decls: BTreeMap<String, String> = in_scope
        .iter()
        .filter(|(prefix, uri)| rendered_ns.get(*prefix) != Some(*uri))
        .map(|(p, u)| (p.clone(), u.clone()))
        .collect();

    if !in_scope.contains_key("") && rendered_ns.get("").is_some_and(|u| !u.is_empty()) {
        decls.insert(String::new(), String::new());
    }
    decls
}

/// Namespaces in scope for an element, keyed by prefix (`""` is the default).
fn in_scope_namespaces(node: Node<'_, '_>) -> BTreeMap<String, String> {
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml") && !ns.uri().is_empty())
        .map(|ns| (ns.name().unwrap_or("").to_owned(), ns.uri().to_owned()))
        .collect()
}

/// The element's qualified name exactly as written in the source.
fn element_qname(node: Node<'_, '_>) -> String {
    let input = node.document().input_text();
    let raw = input.get(node.range().start + 1..).unwrap_or("");
    let end = raw
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(raw.len());

    match &raw[..end] {
        "" => node.tag_name().name().to_owned(),
        qname => qname.to_owned(),
    }
}

/// The attribute's qualified name exactly as written in the source.
///
/// Several prefixes may be bound to one URI, so the prefix cannot be
/// recovered from the namespace alone.
fn attribute_qname(node: Node<'_, '_>, attr: &Attribute<'_, '_>) -> String {
    let local = attr.name();
    let Some(uri) = attr.namespace() else {
        return local.to_owned();
    };

    let written = node.document().input_text().get(attr.range_qname());
    match written {
        Some(qname) if qname.ends_with(local) && qname.contains(':') => qname.to_owned(),
        _ if uri == XML_NS => format!("xml:{local}"),
        _ => node
            .namespaces()
            .find(|n| n.uri() == uri && n.name().is_some())
            .and_then(|n| n.name())
            .map_or_else(|| local.to_owned(), |prefix| format!("{prefix}:{local}")),
    }
}

fn prefix_of(qname: &str) -> &str {
    qname.split_once(':').map_or("", |(prefix, _)| prefix)
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}
