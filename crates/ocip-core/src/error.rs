//! Error types for the OCI-P client

use bwks_request_core::DispatchError;
use bwks_xml_core::XmlError;
use thiserror::Error;

/// Result type for OCI-P operations
pub type OciResult<T> = Result<T, OciError>;

/// Errors that can occur talking to an OCI-P server
#[derive(Debug, Error)]
pub enum OciError {
    /// The server answered the command with an `Error` typed response
    #[error("Error response received\nOCI Command:\n{request}\nOCI Response:\n{response}")]
    Protocol { request: String, response: String },

    /// Handshake failed or a command was issued before login
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP, SOAP fault or connection failure
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Connect or read timeout
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Form binding or operation lookup failed
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Expected element missing from a response or command
    #[error("Element '{element}' missing from {context}")]
    MissingElement { context: String, element: String },

    /// A step of a multi-step operation failed; earlier steps stay applied
    #[error("Step '{step}' failed after {completed:?}: {source}")]
    StepFailed {
        step: String,
        completed: Vec<String>,
        #[source]
        source: Box<OciError>,
    },

    /// Client could not be configured
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl OciError {
    pub fn protocol(request: impl Into<String>, response: impl Into<String>) -> Self {
        Self::Protocol {
            request: request.into(),
            response: response.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn missing_element(context: impl Into<String>, element: impl Into<String>) -> Self {
        Self::MissingElement {
            context: context.into(),
            element: element.into(),
        }
    }

    pub fn step_failed(step: impl Into<String>, completed: Vec<String>, source: OciError) -> Self {
        Self::StepFailed {
            step: step.into(),
            completed,
            source: Box::new(source),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether correcting the input and retrying can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, OciError::Dispatch(_))
    }

    /// Whether the caller should ask for credentials again
    pub fn needs_reauthentication(&self) -> bool {
        match self {
            OciError::Authentication { .. } => true,
            OciError::StepFailed { source, .. } => source.needs_reauthentication(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for OciError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OciError::Timeout {
                message: e.to_string(),
            }
        } else {
            OciError::Transport {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_carries_both_documents() {
        let e = OciError::protocol("<command/>", "<command type=\"Error\"/>");
        let text = e.to_string();
        assert!(text.contains("OCI Command:\n<command/>"));
        assert!(text.contains("OCI Response:\n<command type=\"Error\"/>"));
        assert!(!e.is_recoverable());
    }

    #[test]
    fn test_step_failure_reports_progress() {
        let e = OciError::step_failed(
            "activate number",
            vec!["get assigned domains".into(), "add user".into()],
            OciError::authentication("session expired"),
        );
        assert!(e.to_string().starts_with("Step 'activate number' failed"));
        assert!(e.needs_reauthentication());
        assert!(OciError::Dispatch(DispatchError::missing_argument("userId")).is_recoverable());
    }
}
