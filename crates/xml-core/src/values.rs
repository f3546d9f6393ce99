//! Value extraction and boolean wire conventions

use crate::path::NamespaceAgnosticPath;
use crate::tree::Element;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Value of a flattened child element
///
/// Serializes untagged: `"text"`, `true`/`false` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeValue {
    Text(String),
    Bool(bool),
    Null,
}

impl NodeValue {
    /// Borrow the text, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The boolean, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NodeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NodeValue::Null)
    }
}

impl From<bool> for NodeValue {
    fn from(value: bool) -> Self {
        NodeValue::Bool(value)
    }
}

impl From<&str> for NodeValue {
    fn from(value: &str) -> Self {
        NodeValue::Text(value.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(value: String) -> Self {
        NodeValue::Text(value)
    }
}

impl From<Option<String>> for NodeValue {
    fn from(value: Option<String>) -> Self {
        value.map(NodeValue::Text).unwrap_or(NodeValue::Null)
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value_to_str(self))
    }
}

/// Text of the first element matching `path`, or an attribute for `a/b/@attr`
///
/// `None` when nothing matches or the element has no text.
pub fn node_value(element: &Element, path: &str) -> Option<String> {
    let path = NamespaceAgnosticPath::parse(path).ok()?;
    let target = element.find_path(&path)?;
    match path.attribute() {
        Some(attr) => target.attribute(attr).map(str::to_string),
        None => target.text(),
    }
}

/// Text of every element matching `path`, in document order
///
/// Elements without text contribute an empty string.
pub fn node_values(element: &Element, path: &str) -> Vec<String> {
    element
        .find_all(path)
        .into_iter()
        .map(|e| e.text().unwrap_or_default())
        .collect()
}

/// Flatten the immediate children of `element` into `local name -> value`
///
/// `"true"`/`"false"` (any case) become booleans, empty elements become
/// `Null`, anything else stays text. A repeated name keeps the last value.
pub fn node_list(element: &Element) -> BTreeMap<String, NodeValue> {
    element
        .children()
        .map(|child| {
            let value = match child.text() {
                None => NodeValue::Null,
                Some(text) if text.eq_ignore_ascii_case("true") => NodeValue::Bool(true),
                Some(text) if text.eq_ignore_ascii_case("false") => NodeValue::Bool(false),
                Some(text) => NodeValue::Text(text),
            };
            (child.local_name().to_string(), value)
        })
        .collect()
}

/// Wire form of a boolean
pub fn bool_to_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Lenient boolean: `true`, `1` and `yes` (any case) are true, all else false
pub fn str_to_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1" || value.eq_ignore_ascii_case("yes")
}

/// Wire form of a flattened value
pub fn value_to_str(value: &NodeValue) -> String {
    match value {
        NodeValue::Text(text) => text.clone(),
        NodeValue::Bool(b) => bool_to_str(*b).to_string(),
        NodeValue::Null => String::new(),
    }
}

/// Truthiness of a flattened value, text read with [`str_to_bool`]
pub fn is_truthy(value: &NodeValue) -> bool {
    match value {
        NodeValue::Bool(b) => *b,
        NodeValue::Text(text) => str_to_bool(text),
        NodeValue::Null => false,
    }
}
