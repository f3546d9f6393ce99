//! Error types for request binding and dispatch

use thiserror::Error;

/// Result type for binding and dispatch
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised while turning form inputs into a client call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A required, non-boolean input was not supplied
    #[error("Missing argument: {name}")]
    MissingArgument { name: String },

    /// No catalog entry or handler exists for the operation
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// A bound argument does not have the shape the handler expects
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },
}

impl DispatchError {
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// All binding errors can be fixed by correcting the input and retrying
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

/// Errors raised while building catalogs and operation tables at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Protocol tag is neither `ocip` nor `xsi`
    #[error("Unknown protocol '{0}', expected 'ocip' or 'xsi'")]
    UnknownProtocol(String),

    /// A request of one protocol was placed in the other protocol's catalog
    #[error("Request '{request}' does not belong to the {catalog} catalog")]
    ProtocolMismatch { request: String, catalog: String },

    /// Two requests share a name
    #[error("Duplicate request '{0}'")]
    DuplicateRequest(String),

    /// Two arguments of one request claim the same positional index
    #[error("Request '{request}' has more than one argument at position {index}")]
    PositionCollision { request: String, index: u8 },

    /// The display order names a request that is not declared
    #[error("Display order names undeclared request '{0}'")]
    UnknownOrderedName(String),

    /// A declared request has no handler
    #[error("No handler registered for request '{0}'")]
    MissingHandler(String),

    /// A handler was registered for a request that is not declared
    #[error("Handler registered for undeclared request '{0}'")]
    OrphanHandler(String),
}
