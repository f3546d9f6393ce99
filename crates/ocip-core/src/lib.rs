//! # OCIP-Core
//!
//! Client for the BroadWorks OCI-P provisioning interface over SOAP.
//!
//! A client logs in with the two-phase handshake (`AuthenticationRequest`
//! for a nonce, then `LoginRequest14sp4` with the signed password) and then
//! sends typed commands inside `BroadsoftDocument` envelopes that all carry
//! the session id drawn when the client was built. Responses typed `Error`
//! fail with [`OciError::Protocol`], carrying both documents.
//!
//! ```rust,no_run
//! use bwks_ocip_core::{OciClient, OciConfig};
//!
//! # async fn example() -> bwks_ocip_core::OciResult<()> {
//! let config = OciConfig::new("https://xsp.example.com");
//! let mut client = OciClient::connect(&config, "admin@example.com", "secret").await?;
//! let numbers = client.group_get_available_numbers().await?;
//! println!("{:?}", numbers);
//! client.logout_request().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
mod operations;
pub mod session;
pub mod transport;
pub mod types;

pub use catalog::{catalog, operation_table, OciHandler, OCIP_ORDER, OCIP_REQUESTS};
pub use client::{Exchange, OciClient};
pub use command::{build_command, CommandElement};
pub use config::{OciConfig, DEFAULT_SESSION_LABEL};
pub use error::{OciError, OciResult};
pub use operations::{device_prefix, qualified_password, UNCLASSIFIED};
pub use session::{signed_password, AuthState, FixedSessionId, GroupScope, LabelledSessionId, SessionIdGenerator};
pub use transport::{OciTransport, ScriptedTransport, SoapTransport};
pub use types::{
    AccessDeviceInfo, ConfigFileUpload, NewUser, PrimaryDevice, ScaEndpointOptions, TableRecord, TestUser, UserData,
    VoiceManagement, DEFAULT_PRIMARY_DEVICE, DEFAULT_SCA_DEVICES, USER_DATA_FIELDS,
};
