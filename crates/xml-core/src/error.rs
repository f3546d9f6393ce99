//! Error types for XML handling

use thiserror::Error;

/// Result type for XML operations
pub type XmlResult<T> = Result<T, XmlError>;

/// Errors raised while reading, writing or editing XML
#[derive(Debug, Error)]
pub enum XmlError {
    /// Input is not well-formed XML
    #[error("Malformed XML: {0}")]
    Parse(String),

    /// Document could not be written out
    #[error("XML serialization failed: {0}")]
    Serialize(String),

    /// A path did not resolve to an element
    #[error("Element not found: {0}")]
    NotFound(String),

    /// A path expression is not usable
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl XmlError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
