//! Owned, mutable XML tree
//!
//! Element names keep the prefix they were written with (`x:active`); all
//! lookups go through the local name. `Clone` is a deep copy, which is what
//! the read-modify-write XSI operations rely on to leave fetched documents
//! untouched.

use crate::path::NamespaceAgnosticPath;
use std::fmt;

/// Local part of a possibly prefixed name (`x:active` -> `active`)
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// A node in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// An XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element holding a single text node
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }

    /// Qualified name as written in the document
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Namespace prefix, if the name carries one
    pub fn prefix(&self) -> Option<&str> {
        self.name.rsplit_once(':').map(|(prefix, _)| prefix)
    }

    /// Attributes in document order, namespace declarations included
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Attribute value by qualified name, falling back to a local-name match
    ///
    /// Namespace declarations (`xmlns`, `xmlns:*`) only match by exact name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if let Some((_, value)) = self.attributes.iter().find(|(k, _)| k == name) {
            return Some(value);
        }
        let wanted = local_name(name);
        self.attributes
            .iter()
            .filter(|(k, _)| !is_namespace_declaration(k))
            .find(|(k, _)| local_name(k) == wanted)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace an attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute by qualified name
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(idx).1)
    }

    /// Concatenated direct text content, `None` when the element has none
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for node in &self.children {
            if let Node::Text(t) | Node::CData(t) = node {
                text.get_or_insert_with(String::new).push_str(t);
            }
        }
        text
    }

    /// Replace the direct text content, keeping child elements
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children
            .retain(|node| !matches!(node, Node::Text(_) | Node::CData(_)));
        let text = text.into();
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text));
        }
    }

    /// All child nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Append a raw node
    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Child elements in document order
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Mutable child elements in document order
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given local name
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.children().find(|e| e.local_name() == local_name(local))
    }

    /// Number of child elements
    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    /// Append a child element and return it
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!("element was just pushed"),
        }
    }

    /// Insert a child element before the `index`-th child element
    ///
    /// Text and comment nodes are not counted. An index past the end appends.
    pub fn insert_child(&mut self, index: usize, child: Element) -> &mut Element {
        let position = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, Node::Element(_)))
            .nth(index)
            .map(|(pos, _)| pos)
            .unwrap_or(self.children.len());
        self.children.insert(position, Node::Element(child));
        match &mut self.children[position] {
            Node::Element(e) => e,
            _ => unreachable!("element was just inserted"),
        }
    }

    /// Remove and return the first child element with the given local name
    pub fn remove_child(&mut self, local: &str) -> Option<Element> {
        let wanted = local_name(local);
        let idx = self.children.iter().position(|node| match node {
            Node::Element(e) => e.local_name() == wanted,
            _ => false,
        })?;
        match self.children.remove(idx) {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Drop all children, text and attributes; namespace declarations stay
    pub fn clear(&mut self) {
        self.children.clear();
        self.attributes.retain(|(k, _)| is_namespace_declaration(k));
    }

    /// First element matching `path` below this element
    ///
    /// The first segment is matched against this element's children. A
    /// trailing `@attr` segment is ignored here; see [`crate::node_value`].
    pub fn find(&self, path: &str) -> Option<&Element> {
        let path = NamespaceAgnosticPath::parse(path).ok()?;
        self.find_path(&path)
    }

    /// First element matching a parsed path
    pub fn find_path(&self, path: &NamespaceAgnosticPath) -> Option<&Element> {
        let mut trail = Vec::new();
        if self.locate(path, 0, &mut trail) {
            self.walk(&trail)
        } else {
            None
        }
    }

    /// Mutable variant of [`Element::find`]
    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        let path = NamespaceAgnosticPath::parse(path).ok()?;
        let mut trail = Vec::new();
        if self.locate(&path, 0, &mut trail) {
            self.walk_mut(&trail)
        } else {
            None
        }
    }

    /// All elements matching `path`, in document order
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        if let Ok(path) = NamespaceAgnosticPath::parse(path) {
            self.collect(&path, 0, &mut out);
        }
        out
    }

    /// First element (this one included) with the given local name, depth first
    pub fn find_descendant(&self, local: &str) -> Option<&Element> {
        let mut trail = Vec::new();
        if self.locate_descendant(local_name(local), &mut trail) {
            self.walk(&trail)
        } else {
            None
        }
    }

    /// Mutable variant of [`Element::find_descendant`]
    pub fn find_descendant_mut(&mut self, local: &str) -> Option<&mut Element> {
        let mut trail = Vec::new();
        if self.locate_descendant(local_name(local), &mut trail) {
            self.walk_mut(&trail)
        } else {
            None
        }
    }

    /// This element and every element below it, depth first
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    fn locate(&self, path: &NamespaceAgnosticPath, depth: usize, trail: &mut Vec<usize>) -> bool {
        if depth == path.segments().len() {
            return true;
        }
        for (idx, node) in self.children.iter().enumerate() {
            if let Node::Element(child) = node {
                if path.segment_matches(depth, child.local_name()) {
                    trail.push(idx);
                    if child.locate(path, depth + 1, trail) {
                        return true;
                    }
                    trail.pop();
                }
            }
        }
        false
    }

    fn locate_descendant(&self, local: &str, trail: &mut Vec<usize>) -> bool {
        if self.local_name() == local {
            return true;
        }
        for (idx, node) in self.children.iter().enumerate() {
            if let Node::Element(child) = node {
                trail.push(idx);
                if child.locate_descendant(local, trail) {
                    return true;
                }
                trail.pop();
            }
        }
        false
    }

    fn collect<'a>(&'a self, path: &NamespaceAgnosticPath, depth: usize, out: &mut Vec<&'a Element>) {
        if depth == path.segments().len() {
            out.push(self);
            return;
        }
        for child in self.children() {
            if path.segment_matches(depth, child.local_name()) {
                child.collect(path, depth + 1, out);
            }
        }
    }

    fn walk(&self, trail: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &idx in trail {
            current = match current.children.get(idx) {
                Some(Node::Element(e)) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    fn walk_mut(&mut self, trail: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &idx in trail {
            current = match current.children.get_mut(idx) {
                Some(Node::Element(e)) => e,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// A parsed or constructed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wrap a document element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The document element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable document element
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Take the document element
    pub fn into_root(self) -> Element {
        self.root
    }

    /// First element matching `path`, relative to the document element
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.root.find(path)
    }

    /// Mutable variant of [`Document::find`]
    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        self.root.find_mut(path)
    }

    /// All elements matching `path`, relative to the document element
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        self.root.find_all(path)
    }

    /// First element in the whole document with the given local name
    pub fn find_descendant(&self, local: &str) -> Option<&Element> {
        self.root.find_descendant(local)
    }

    /// Mutable variant of [`Document::find_descendant`]
    pub fn find_descendant_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.root.find_descendant_mut(local)
    }

    /// Absolute query: the first segment names the document element itself
    ///
    /// `select("services/donotdisturb")` matches `<a:services><a:donotdisturb/></a:services>`
    /// as well as `<services xmlns="ns2"><donotdisturb/></services>`.
    pub fn select(&self, path: &str) -> Option<&Element> {
        let parsed = NamespaceAgnosticPath::parse(path).ok()?;
        if !parsed.segment_matches(0, self.root.local_name()) {
            return None;
        }
        let rest = parsed.segments()[1..].join("/");
        if rest.is_empty() {
            Some(&self.root)
        } else {
            self.root.find(&rest)
        }
    }

    /// Declare `xmlns:{prefix}` on the document element unless already present
    pub fn declare_namespace(&mut self, prefix: &str, uri: &str) {
        let attr = format!("xmlns:{}", prefix);
        if self.root.attribute(&attr).is_none() {
            self.root.set_attribute(attr, uri);
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::parse::to_xml_string(self, true).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
