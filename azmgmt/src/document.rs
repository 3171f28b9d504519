//! Namespaced XML documents exchanged with the management API
//!
//! Request and response bodies are treated as untyped element trees. Only the
//! elements the client actually reads are looked up, always qualified with the
//! service namespace, and a missing element is a protocol error rather than an
//! absent value.

use std::fmt;

use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

use crate::errors::{MgmtError, Result};

/// A response body that may be empty
///
/// `RequestFailed` carries one of these so the caller can render whatever the
/// server sent, or an empty placeholder when it sent nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Option<Element>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root: Some(root) }
    }

    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

}

impl From<Option<Element>> for Document {
    fn from(root: Option<Element>) -> Self {
        Self { root }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => {
                let config = EmitterConfig::new()
                    .perform_indent(true)
                    .write_document_declaration(false);
                let mut out = Vec::new();
                root.write_with_config(&mut out, config)
                    .map_err(|_| fmt::Error)?;
                f.write_str(&String::from_utf8_lossy(&out))
            }
            None => Ok(()),
        }
    }
}

/// Create an element in `namespace` without declaring it
pub fn element(name: &str, namespace: &str) -> Element {
    let mut element = Element::new(name);
    element.namespace = Some(namespace.to_string());
    element
}

/// Create a document root that declares `namespace` as the default namespace
pub fn root_element(name: &str, namespace: &str) -> Element {
    let mut root = element(name, namespace);
    let mut namespaces = Namespace::empty();
    namespaces.put("", namespace);
    root.namespaces = Some(namespaces);
    root
}

/// Create an element in `namespace` holding a single text node
pub fn text_element(name: &str, namespace: &str, text: &str) -> Element {
    let mut element = element(name, namespace);
    element.children.push(XMLNode::Text(text.to_string()));
    element
}

fn matches(element: &Element, name: &str, namespace: &str) -> bool {
    element.name == name && element.namespace.as_deref() == Some(namespace)
}

/// First direct child named `name` in `namespace`
pub fn child<'a>(parent: &'a Element, name: &str, namespace: &str) -> Option<&'a Element> {
    parent
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .find(|e| matches(e, name, namespace))
}

/// Like [`child`], but a missing element is a protocol error
pub fn required_child<'a>(parent: &'a Element, name: &str, namespace: &str) -> Result<&'a Element> {
    child(parent, name, namespace).ok_or_else(|| {
        MgmtError::protocol(
            format!("<{}>", parent.name),
            format!("missing element {{{}}}{}", namespace, name),
        )
    })
}

/// Trimmed text content of an element (empty string when it has none)
pub fn text(element: &Element) -> String {
    element
        .get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed text of the required child `name`
pub fn required_text(parent: &Element, name: &str, namespace: &str) -> Result<String> {
    required_child(parent, name, namespace).map(text)
}

/// All descendants named `name` in `namespace`, in document order
pub fn descendants<'a>(parent: &'a Element, name: &str, namespace: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_descendants(parent, name, namespace, &mut found);
    found
}

fn collect_descendants<'a>(
    parent: &'a Element,
    name: &str,
    namespace: &str,
    found: &mut Vec<&'a Element>,
) {
    for node in parent.children.iter().filter_map(XMLNode::as_element) {
        if matches(node, name, namespace) {
            found.push(node);
        }
        collect_descendants(node, name, namespace, found);
    }
}

/// Mutable variant of [`descendants`]
pub fn descendants_mut<'a>(
    parent: &'a mut Element,
    name: &str,
    namespace: &str,
) -> Vec<&'a mut Element> {
    let mut found = Vec::new();
    for node in parent.children.iter_mut().filter_map(XMLNode::as_mut_element) {
        if matches(node, name, namespace) {
            // Matching elements are not searched further; settings never nest.
            found.push(node);
        } else {
            found.extend(descendants_mut(node, name, namespace));
        }
    }
    found
}

/// Parse a body received from `context` (usually the request URI)
pub fn parse(bytes: &[u8], context: &str) -> Result<Element> {
    Element::parse(bytes).map_err(|e| MgmtError::protocol(context, e.to_string()))
}

/// Serialize an element, optionally with an XML declaration, without indentation
pub fn to_bytes(element: &Element, declaration: bool) -> Result<Vec<u8>> {
    let config = EmitterConfig::new()
        .perform_indent(false)
        .write_document_declaration(declaration);
    let mut out = Vec::new();
    element
        .write_with_config(&mut out, config)
        .map_err(|e| MgmtError::protocol(format!("<{}>", element.name), e.to_string()))?;
    Ok(out)
}
