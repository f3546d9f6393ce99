//! Error types for the request console

use bwks_ocip_core::OciError;
use bwks_request_core::{DispatchError, RegistryError};
use bwks_xml_core::XmlError;
use bwks_xsi_core::XsiError;
use thiserror::Error;

/// Result type for console operations
pub type BwksResult<T> = std::result::Result<T, BwksError>;

/// Errors raised by the facade
#[derive(Error, Debug)]
pub enum BwksError {
    #[error(transparent)]
    Xsi(#[from] XsiError),

    #[error(transparent)]
    Oci(#[from] OciError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// A catalog and its handler table disagree
    #[error("Operation table error: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Infra(#[from] bwks_infra_common::Error),

    /// A setting the operation needs has not been stored
    #[error("Missing setting: {name}")]
    MissingSetting { name: String },
}

impl BwksError {
    pub fn missing_setting(name: impl Into<String>) -> Self {
        Self::MissingSetting { name: name.into() }
    }

    /// Whether the user can fix this by correcting input or settings
    pub fn is_recoverable(&self) -> bool {
        match self {
            BwksError::Xsi(e) => e.is_recoverable(),
            BwksError::Oci(e) => e.is_recoverable(),
            BwksError::Dispatch(e) => e.is_recoverable(),
            BwksError::MissingSetting { .. } => true,
            BwksError::Xml(_) | BwksError::Registry(_) | BwksError::Infra(_) => false,
        }
    }
}
