//! # XSI-Core
//!
//! Client for the BroadWorks XSI-Actions REST interface.
//!
//! Every call is made on behalf of one user with HTTP basic auth against
//! `{base}/com.broadsoft.xsi-actions/v2.0/user/{user}/{endpoint}`. Redirects
//! are followed by the client itself so the credentials survive the hop.
//! Feature setters fetch the current document, edit a copy and PUT it back.
//!
//! ```rust,no_run
//! use bwks_xsi_core::{XsiClient, XsiConfig};
//!
//! # async fn example() -> bwks_xsi_core::XsiResult<()> {
//! let client = XsiClient::new(XsiConfig::new("https://xsp.example.com"), "alice@example.com", "secret")?;
//! let dnd = client.get_dnd().await?;
//! client.set_dnd(!dnd.active, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
mod operations;
pub mod types;
pub mod updates;

pub use catalog::{catalog, operation_table, XsiHandler, XSI_ORDER, XSI_REQUESTS};
pub use client::XsiClient;
pub use config::{XsiConfig, DEFAULT_DEVICE_TYPE};
pub use error::{XsiError, XsiResult};
pub use operations::{device_credentials, device_name_by_type};
pub use types::{
    AnywhereState, DeviceCredentials, DirectoryData, DndState, FeatureRecord, ForwardType, ForwardingState,
    MobilityState, RecordingMode, RemoteOfficeState, SimRingLocation, SimRingState, SimRingUpdate,
};
