//! Namespace-agnostic paths
//!
//! A path such as `services/donotdisturb` matches `donotdisturb` nested in
//! `services` whatever namespace prefix or default namespace the document
//! uses. A final `@name` segment addresses an attribute of the last element
//! (`accessDevice/deviceType/@level`).

use crate::error::{XmlError, XmlResult};
use std::fmt;

/// Parsed path with a wildcard namespace on every segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceAgnosticPath {
    segments: Vec<String>,
    attribute: Option<String>,
}

impl NamespaceAgnosticPath {
    /// Parse a slash separated path
    ///
    /// Empty segments (leading, trailing or doubled slashes) are ignored, so
    /// `a//b/` reads as `a/b`. An attribute segment must come last.
    pub fn parse(path: &str) -> XmlResult<Self> {
        let mut segments = Vec::new();
        let mut attribute = None;

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for (idx, part) in parts.iter().enumerate() {
            if let Some(attr) = part.strip_prefix('@') {
                if idx + 1 != parts.len() {
                    return Err(XmlError::invalid_path(path, "attribute segment must be last"));
                }
                if attr.is_empty() {
                    return Err(XmlError::invalid_path(path, "empty attribute name"));
                }
                attribute = Some(attr.to_string());
            } else {
                segments.push(part.to_string());
            }
        }

        if segments.is_empty() && attribute.is_none() {
            return Err(XmlError::invalid_path(path, "empty path"));
        }

        Ok(Self { segments, attribute })
    }

    /// Element segments, each matched by local name (`*` matches any element)
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Attribute addressed by the path, if any
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Whether segment `idx` accepts an element with the given local name
    pub fn segment_matches(&self, idx: usize, local: &str) -> bool {
        match self.segments.get(idx) {
            Some(seg) => seg == "*" || strip_prefix(seg) == local,
            None => false,
        }
    }

    /// Clark-notation rendering with wildcard namespaces (`{*}a/{*}b`)
    pub fn to_wildcard_query(&self) -> String {
        let mut out = self
            .segments
            .iter()
            .map(|s| format!("{{*}}{}", strip_prefix(s)))
            .collect::<Vec<_>>()
            .join("/");
        if let Some(attr) = &self.attribute {
            if !out.is_empty() {
                out.push('/');
            }
            out.push('@');
            out.push_str(attr);
        }
        out
    }
}

impl fmt::Display for NamespaceAgnosticPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))?;
        if let Some(attr) = &self.attribute {
            if !self.segments.is_empty() {
                write!(f, "/")?;
            }
            write!(f, "@{}", attr)?;
        }
        Ok(())
    }
}

// Callers sometimes write prefixed segments (`xsi:active`); the prefix is
// irrelevant to matching.
fn strip_prefix(segment: &str) -> &str {
    segment.rsplit(':').next().unwrap_or(segment)
}
