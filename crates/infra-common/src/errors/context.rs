use crate::errors::types::Error;
use std::fmt;

/// Where an infrastructure error happened
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    /// Source being processed, e.g. a config file path
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        ErrorContext {
            component: component.into(),
            operation: operation.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component, self.operation)?;
        match &self.details {
            Some(details) => write!(f, " ({})", details),
            None => Ok(()),
        }
    }
}

/// Append an [`ErrorContext`] to an error's message
pub trait ErrorExt {
    fn context(self, ctx: ErrorContext) -> Error;
}

impl ErrorExt for Error {
    fn context(self, ctx: ErrorContext) -> Error {
        match self {
            Error::Config(msg) => Error::Config(format!("{} [{}]", msg, ctx)),
            Error::Logging(msg) => Error::Logging(format!("{} [{}]", msg, ctx)),
        }
    }
}
