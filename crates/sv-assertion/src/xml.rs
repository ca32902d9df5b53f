//! Generic XML parse into an owned, namespace-resolved element tree.
//!
//! This is the structural view of the assertion used after the signature
//! has been checked. Names are matched by namespace URI and local name,
//! never by prefix, so `saml:Conditions` and a default-namespace
//! `Conditions` are the same element when they resolve to the same URI.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::{ValidationError, ValidationResult};

/// An XML element with resolved names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI, empty when the element is in no namespace.
    pub namespace: String,
    /// Local name.
    pub name: String,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<Attribute>,
    /// Child elements in document order.
    pub children: Vec<Element>,
    /// Concatenated character data of this element, trimmed.
    pub text: String,
}

/// An XML attribute with a resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI, empty for unprefixed attributes.
    pub namespace: String,
    /// Local name.
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

impl Element {
    /// Returns true if this element has the given namespace and local name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }

    /// Returns the value of an unprefixed attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_empty() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    /// Returns every child element with the given name, in document order.
    ///
    /// A single matching child and a repeated one both come back as a list.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(namespace, name))
    }
}

/// Parses XML text into an element tree rooted at the document element.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedAssertion`] for malformed XML, an
/// unbound namespace prefix, or a document type declaration.
pub fn parse(xml: &str) -> ValidationResult<Element> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let namespace = resolved_namespace(&ns)?;

        match event {
            Event::Start(start) => {
                stack.push(open_element(&reader, namespace, &start)?);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, namespace, &start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ValidationError::malformed("unbalanced end tag"))?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(&cdata)
                        .map_err(|e| ValidationError::malformed(format!("CDATA is not UTF-8: {e}")))?;
                    current.text.push_str(text);
                }
            }
            Event::DocType(_) => {
                return Err(ValidationError::malformed(
                    "document type declarations are not allowed",
                ));
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(ValidationError::malformed("unexpected end of document"));
    }
    root.ok_or_else(|| ValidationError::malformed("document has no root element"))
}

fn resolved_namespace(ns: &ResolveResult<'_>) -> ValidationResult<String> {
    match ns {
        ResolveResult::Bound(ns) => Ok(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(ValidationError::malformed(format!(
            "unbound namespace prefix {}",
            String::from_utf8_lossy(prefix)
        ))),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: String,
    start: &BytesStart<'_>,
) -> ValidationResult<Element> {
    let name = utf8(start.local_name().as_ref())?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (ns, local) = reader.resolve_attribute(attr.key);
        attributes.push(Attribute {
            namespace: resolved_namespace(&ns)?,
            name: utf8(local.as_ref())?,
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(Element {
        namespace,
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    mut element: Element,
) -> ValidationResult<()> {
    // Character data split by comments or processing instructions is one
    // value, so whitespace is trimmed only once the element is complete.
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_owned();
    }

    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(ValidationError::malformed("multiple root elements"))
    }
}

fn utf8(bytes: &[u8]) -> ValidationResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ValidationError::malformed(format!("name is not UTF-8: {e}")))
}
