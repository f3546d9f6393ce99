//! Layered configuration loading
//!
//! Values come from an optional TOML file, then from environment variables
//! carrying the given prefix (`BWKS_XSI__BASE_URL` sets `xsi.base_url`).

use crate::errors::context::{ErrorContext, ErrorExt};
use crate::errors::types::{Error, Result};
use config::{Config, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Load a configuration value of type `T`
///
/// A missing file is not an error; every field of `T` is expected to carry a
/// serde default.
pub fn load_config<T: DeserializeOwned>(path: Option<&Path>, env_prefix: &str) -> Result<T> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        debug!("Loading configuration from {}", path.display());
        builder = builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .prefix_separator("_")
            .separator("__"),
    );

    let ctx = ErrorContext::new("config", "load")
        .with_details(path.map(|p| p.display().to_string()).unwrap_or_else(|| "<env>".to_string()));

    let settings = builder
        .build()
        .map_err(|e| Error::Config(e.to_string()).context(ctx.clone()))?;

    settings
        .try_deserialize::<T>()
        .map_err(|e| Error::Config(e.to_string()).context(ctx))
}
