//! Minimal in-memory XML element tree.
//!
//! Builders in this crate return owned [`Element`] subtrees which the caller
//! composes; nothing holds a reference into a parent while it is being
//! built. Element and attribute names are stored with their namespace
//! prefix (`mets:fileGrp`, `xlink:href`) and namespace declarations are plain
//! `xmlns:*` attributes, which is all the METS/DNX target schema needs.
//!
//! Serialization goes through `quick-xml`'s writer so escaping is handled in
//! one place.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{BuildError, BuildResult};

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Qualified element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute, builder style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Mutable access to attribute values, keyed by name.
    pub fn attributes_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.attributes
            .iter_mut()
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Append a child element, builder style.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Append several child elements, builder style.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Append text content, builder style.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Whether the element has no children at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child elements.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// First direct child with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children().find(|e| e.name == name)
    }

    /// All direct children with the given name.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().filter(move |e| e.name == name)
    }

    /// This element and all descendants, depth-first in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in self.children() {
            child.collect_descendants(out);
        }
    }

    /// Descendants (including self) with the given name.
    pub fn descendants_named(&self, name: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    /// Element anywhere in the tree carrying `ID="{id}"`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.descendants()
            .into_iter()
            .find(|e| e.attr("ID") == Some(id))
    }

    /// Apply `f` to this element and every descendant, parents first.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for node in &mut self.children {
            if let Node::Element(child) = node {
                child.visit_mut(f);
            }
        }
    }

    /// Write the element as a standalone XML document.
    pub fn write_document<W: Write>(&self, out: W) -> BuildResult<()> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialize_error)?;
        write_element(&mut writer, self)
    }

    /// Serialize the element as a standalone XML document string.
    pub fn to_xml_string(&self) -> BuildResult<String> {
        let mut buffer = Vec::new();
        self.write_document(&mut buffer)?;
        String::from_utf8(buffer).map_err(serialize_error)
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> BuildResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialize_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialize_error)?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(serialize_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(serialize_error)
}

fn serialize_error(e: impl std::fmt::Display) -> BuildError {
    BuildError::Serialize(e.to_string())
}
