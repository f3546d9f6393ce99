//! Error types for the XSI client

use bwks_request_core::DispatchError;
use bwks_xml_core::XmlError;
use thiserror::Error;

/// Result type for XSI operations
pub type XsiResult<T> = Result<T, XsiError>;

/// Errors that can occur talking to an XSI server
#[derive(Debug, Error)]
pub enum XsiError {
    /// Server answered outside the 2xx class
    #[error("HTTP request {url} failed ({status}): {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// No device of the requested type in the device profile
    #[error("No device of type '{device_type}' in the device profile")]
    DeviceNotFound { device_type: String },

    /// Redirect chain longer than the configured limit
    #[error("Too many redirects ({hops}) starting at {url}")]
    TooManyRedirects { url: String, hops: usize },

    /// Connection, TLS or protocol failure below HTTP status level
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Connect or read timeout
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Response body is not usable XML
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Form binding or operation lookup failed
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Argument value outside the accepted set
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Expected element missing from a server document
    #[error("Element '{element}' missing from {endpoint}")]
    MissingElement { endpoint: String, element: String },

    /// Client could not be configured
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl XsiError {
    /// Create an HTTP status error
    pub fn http(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn device_not_found(device_type: impl Into<String>) -> Self {
        Self::DeviceNotFound {
            device_type: device_type.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_element(endpoint: impl Into<String>, element: impl Into<String>) -> Self {
        Self::MissingElement {
            endpoint: endpoint.into(),
            element: element.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether correcting the input and retrying can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            XsiError::Dispatch(_) | XsiError::InvalidArgument { .. } | XsiError::DeviceNotFound { .. }
        )
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            XsiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for XsiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            XsiError::Timeout {
                message: e.to_string(),
            }
        } else {
            XsiError::Transport {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(XsiError::Dispatch(DispatchError::missing_argument("type")).is_recoverable());
        assert!(XsiError::device_not_found("Polycom-550").is_recoverable());
        assert!(!XsiError::http("https://xsp/x", 401, "").is_recoverable());
        assert_eq!(XsiError::http("https://xsp/x", 404, "").status(), Some(404));
    }

    #[test]
    fn test_http_error_display() {
        let e = XsiError::http("https://xsp/services/donotdisturb", 400, "<ErrorInfo/>");
        assert_eq!(
            e.to_string(),
            "HTTP request https://xsp/services/donotdisturb failed (400): <ErrorInfo/>"
        );
    }
}
