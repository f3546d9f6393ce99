//! # XML-Core
//!
//! Small owned XML tree used by the XSI and OCI-P clients.
//!
//! BroadWorks servers answer with structurally identical documents under
//! different (or absent) namespace URIs, so every query in this crate matches
//! elements by local name only. Paths are written `a/b/c`, with an optional
//! trailing `@attr` segment selecting an attribute of the last element.
//!
//! ```rust
//! use bwks_xml_core::{parse, node_value};
//!
//! let doc = parse(br#"<x:DoNotDisturb xmlns:x="http://schema.broadsoft.com/xsi">
//!     <x:active>true</x:active>
//! </x:DoNotDisturb>"#).unwrap();
//!
//! assert_eq!(node_value(doc.root(), "active").as_deref(), Some("true"));
//! ```

pub mod edit;
pub mod error;
pub mod parse;
pub mod path;
pub mod tree;
pub mod values;

pub use edit::{apply_change, apply_changes, config_value};
pub use error::{XmlError, XmlResult};
pub use parse::{parse, serialize};
pub use path::NamespaceAgnosticPath;
pub use tree::{local_name, Document, Element, Node};
pub use values::{
    bool_to_str, is_truthy, node_list, node_value, node_values, str_to_bool, value_to_str,
    NodeValue,
};

/// Namespace URI of the `xsi:` prefix used for nil markers and OCI-P command types
pub const XML_SCHEMA_INSTANCE_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
