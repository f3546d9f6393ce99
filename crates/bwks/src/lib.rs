//! # BWKS
//!
//! Request console over the BroadWorks XSI and OCI-P clients.
//!
//! A [`Console`] owns both operation tables. Each execution opens its own
//! client from the stored credentials, binds the submitted form against the
//! request's arguments and runs the matching handler. Settings live behind a
//! [`PropertyAccessor`] supplied by the caller.
//!
//! ```rust,no_run
//! use bwks::{form_inputs, init, AdminCredentials, BwksConfig, InMemoryProperties};
//!
//! # async fn example() -> bwks::BwksResult<()> {
//! let config = BwksConfig::load(Some("bwks.toml".as_ref()))?;
//! let console = init(&config)?;
//! let admin = AdminCredentials::new("admin@example.com", "secret", "https://xsp.example.com");
//! let mut props = InMemoryProperties::new();
//!
//! let report = console
//!     .execute_ocip("user_get", &form_inputs([("userId", "alice@example.com")]), &admin, &mut props)
//!     .await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod config;
pub mod console;
pub mod error;
pub mod properties;

pub use account::{Account, AdminCredentials};
pub use config::BwksConfig;
pub use console::{Console, ExecutionReport, RenderedRequest};
pub use error::{BwksError, BwksResult};
pub use properties::{InMemoryProperties, DEVICE_NAME, DEVICE_TYPE, DM_CONFIG, FILE_CONTENT};

pub use bwks_request_core::{form_inputs, FormInputs, PropertyAccessor, PropertyValue};

use bwks_infra_common::{log_welcome, setup_logging};
use tracing::debug;

/// Install logging for `config` and build the console
///
/// Logging is installed by the first call only; later calls reuse it.
pub fn init(config: &BwksConfig) -> BwksResult<Console> {
    match setup_logging(&config.logging) {
        Ok(()) => log_welcome(&config.logging.app_name, env!("CARGO_PKG_VERSION")),
        Err(bwks_infra_common::Error::Logging(reason)) => {
            debug!(reason = %reason, "logging already installed")
        }
        Err(e) => return Err(e.into()),
    }
    Console::new(config.clone())
}
