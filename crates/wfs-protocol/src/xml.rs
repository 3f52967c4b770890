//! Minimal namespace-prefix-aware XML tree.
//!
//! WFS responses are small enough to hold in memory, and the lookups the
//! client needs (any-namespace tag search, text content, prefix checks) are
//! awkward on a streaming reader. Prefixes are kept as written; namespace URIs
//! are not resolved.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use wfs_common::{WfsError, WfsResult};

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its prefix split from the local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    prefix: Option<String>,
    local_name: String,
    /// Attributes keyed by qualified name, in document order.
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Split `gml:id` into `(Some("gml"), "id")`.
fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> WfsResult<Self> {
        let qname = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let (prefix, local_name) = split_qname(&qname);

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| WfsError::Parse(format!("malformed attribute: {}", e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| WfsError::Parse(format!("bad attribute value for '{}': {}", key, e)))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            prefix: prefix.map(str::to_string),
            local_name: local_name.to_string(),
            attributes,
            children: Vec::new(),
        })
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Attribute by exact qualified name, e.g. `gml:id`.
    pub fn attribute(&self, qname: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == qname)
            .map(|(_, v)| v.as_str())
    }

    /// First attribute whose local part matches, whatever its prefix.
    pub fn attribute_by_local_name(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| split_qname(k).1 == local)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Element children only; text and whitespace nodes are skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Descendants (not including `self`) with the given local name, in
    /// document order, whatever their prefix.
    pub fn descendants_by_local_name(&self, local: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in self.child_elements() {
            child.collect_by_local_name(local, &mut out);
        }
        out
    }

    fn collect_by_local_name<'a>(&'a self, local: &str, out: &mut Vec<&'a Element>) {
        if self.local_name == local {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_by_local_name(local, out);
        }
    }
}

/// A parsed document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(xml: &str) -> WfsResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(Element::from_start(&e)?),
                Ok(Event::Empty(e)) => {
                    let element = Element::from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| WfsError::Parse("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| WfsError::Parse(format!("bad text content: {}", e)))?;
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                        parent.children.push(Node::Text(text));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(WfsError::Parse(format!(
                        "XML parsing error at position {}: {:?}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(WfsError::Parse(format!(
                "document ended inside <{}>",
                open.qualified_name()
            )));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| WfsError::Parse("document has no root element".to_string()))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements (root included) with the given local name, any prefix.
    pub fn elements_by_local_name(&self, local: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.collect_by_local_name(local, &mut out);
        out
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> WfsResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_some() => {
            return Err(WfsError::Parse("multiple root elements".to_string()))
        }
        None => *root = Some(element),
    }
    Ok(())
}
