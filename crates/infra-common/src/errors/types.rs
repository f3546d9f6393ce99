use thiserror::Error;

/// Errors raised while setting up the workspace's shared services
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// A global subscriber is already installed, or the filter is invalid
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result alias for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;
