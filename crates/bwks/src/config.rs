//! Console configuration
//!
//! ```toml
//! [xsi]
//! base_url = "https://xsp.example.com"
//! max_redirects = 5
//!
//! [ocip]
//! base_url = "https://xsp.example.com"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every value can be overridden from the environment, e.g.
//! `BWKS_OCIP__SESSION_LABEL`.

use crate::error::{BwksError, BwksResult};
use bwks_infra_common::{load_config, LoggingConfig};
use bwks_ocip_core::OciConfig;
use bwks_xsi_core::XsiConfig;
use serde::Deserialize;
use std::path::Path;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "BWKS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BwksConfig {
    pub xsi: XsiConfig,
    pub ocip: OciConfig,
    pub logging: LoggingConfig,
}

impl BwksConfig {
    /// Load from an optional TOML file layered under `BWKS_*` variables
    pub fn load(path: Option<&Path>) -> BwksResult<Self> {
        Ok(load_config(path, ENV_PREFIX)?)
    }

    /// Parse a TOML document, without environment overrides
    pub fn from_toml_str(text: &str) -> BwksResult<Self> {
        toml::from_str(text).map_err(|e| BwksError::Infra(bwks_infra_common::Error::Config(e.to_string())))
    }

    /// Point both protocols at the same XSP
    pub fn with_server(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.xsi.base_url = base_url.clone();
        self.ocip.base_url = base_url;
        self
    }

    /// XSI settings for another XSP, keeping every other value
    pub fn xsi_for(&self, server: &str) -> XsiConfig {
        XsiConfig {
            base_url: server.to_string(),
            ..self.xsi.clone()
        }
    }

    /// OCI-P settings for another XSP, keeping every other value
    pub fn ocip_for(&self, server: &str) -> OciConfig {
        OciConfig {
            base_url: server.to_string(),
            ..self.ocip.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwks_ocip_core::DEFAULT_SESSION_LABEL;
    use bwks_xsi_core::DEFAULT_DEVICE_TYPE;

    #[test]
    fn test_defaults() {
        let config = BwksConfig::default();
        assert_eq!(config.xsi.max_redirects, 5);
        assert_eq!(config.xsi.default_device_type, DEFAULT_DEVICE_TYPE);
        assert_eq!(config.ocip.session_label, DEFAULT_SESSION_LABEL);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = BwksConfig::from_toml_str(
            r#"
            [xsi]
            base_url = "https://xsp1.example.com"
            ucaas = true

            [ocip]
            request_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.xsi.base_url, "https://xsp1.example.com");
        assert!(config.xsi.ucaas);
        assert_eq!(config.xsi.connect_timeout_secs, 10);
        assert_eq!(config.ocip.request_timeout_secs, 5);
        assert_eq!(config.ocip.base_url, "");
    }

    #[test]
    fn test_server_override_keeps_settings() {
        let mut config = BwksConfig::default().with_server("https://a.example.com");
        config.ocip.session_label = "label".to_string();
        let ocip = config.ocip_for("https://b.example.com");
        assert_eq!(ocip.base_url, "https://b.example.com");
        assert_eq!(ocip.session_label, "label");
        assert_eq!(config.xsi.base_url, "https://a.example.com");
    }
}
