//! Path-addressed edits on device configuration documents
//!
//! Every edit works on a deep copy and returns it; the input document is
//! never modified.

use crate::error::{XmlError, XmlResult};
use crate::path::NamespaceAgnosticPath;
use crate::tree::{local_name, Document, Element};
use crate::values::node_value;
use tracing::trace;

/// Set the text (`a/b/c`) or attribute (`a/b/c/@p`) addressed by `path`
///
/// The path is relative to the document element. Missing elements along the
/// way are created with the namespace prefix of their parent.
pub fn apply_change(doc: &Document, path: &str, value: &str) -> XmlResult<Document> {
    let mut copy = doc.clone();
    set_in_place(&mut copy, path, value)?;
    Ok(copy)
}

/// Apply several changes in iteration order
pub fn apply_changes<I, K, V>(doc: &Document, changes: I) -> XmlResult<Document>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut copy = doc.clone();
    for (path, value) in changes {
        set_in_place(&mut copy, path.as_ref(), value.as_ref())?;
    }
    Ok(copy)
}

/// Read back a value addressed the same way as [`apply_change`]
pub fn config_value(doc: &Document, path: &str) -> Option<String> {
    node_value(doc.root(), path)
}

fn set_in_place(doc: &mut Document, path: &str, value: &str) -> XmlResult<()> {
    let parsed = NamespaceAgnosticPath::parse(path)?;
    trace!(path, value, "applying config change");

    let mut current: &mut Element = doc.root_mut();
    for segment in parsed.segments() {
        if segment == "*" {
            return Err(XmlError::invalid_path(path, "wildcards cannot be created"));
        }
        let local = local_name(segment);
        let existing = current.children().position(|e| e.local_name() == local);
        current = match existing {
            Some(idx) => current
                .children_mut()
                .nth(idx)
                .ok_or_else(|| XmlError::NotFound(path.to_string()))?,
            None => {
                let name = match current.prefix() {
                    Some(prefix) => format!("{}:{}", prefix, local),
                    None => local.to_string(),
                };
                current.push_child(Element::new(name))
            }
        };
    }

    match parsed.attribute() {
        Some(attr) => current.set_attribute(attr, value),
        None => current.set_text(value),
    }
    Ok(())
}
