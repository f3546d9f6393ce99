//! # Infra-Common
//!
//! Shared infrastructure for the BroadWorks marshalling workspace.
//!
//! - `logging`: `tracing-subscriber` setup and contextual spans
//! - `config`: layered file + environment configuration loading
//! - `errors`: the common error type and error context helpers

pub mod config;
pub mod errors;
pub mod logging;

pub use config::load_config;
pub use errors::context::{ErrorContext, ErrorExt};
pub use errors::types::{Error, Result};
pub use logging::context::LogContext;
pub use logging::setup::{log_welcome, parse_log_level, setup_logging, LoggingConfig};
