//! OCI-P client configuration

use serde::Deserialize;
use std::time::Duration;

/// Label hashed into every generated session id
pub const DEFAULT_SESSION_LABEL: &str = "UC-ONE UI Test OCI-P SOAP";

/// Path of the provisioning web service below the XSP root
pub const SERVICE_PATH: &str = "webservice/services/ProvisioningService";

/// Configuration for [`crate::OciClient`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OciConfig {
    /// XSP root URL, e.g. `https://xsp.example.com`
    pub base_url: String,
    /// Explicit SOAP endpoint; derived from `base_url` when unset
    pub override_location: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub session_label: String,
    pub accept_invalid_certs: bool,
}

impl Default for OciConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            override_location: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            session_label: DEFAULT_SESSION_LABEL.to_string(),
            accept_invalid_certs: false,
        }
    }
}

impl OciConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.override_location = Some(location.into());
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout_secs = whole_secs(connect);
        self.request_timeout_secs = whole_secs(request);
        self
    }

    pub fn with_session_label(mut self, label: impl Into<String>) -> Self {
        self.session_label = label.into();
        self
    }

    pub fn with_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// SOAP endpoint the provisioning messages are posted to
    pub fn service_location(&self) -> String {
        match &self.override_location {
            Some(location) => location.clone(),
            None => format!("{}/{}", self.base_url.trim_end_matches('/'), SERVICE_PATH),
        }
    }
}

/// Seconds rounded up, so a sub-second timeout never becomes zero
fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_location_from_base_url() {
        let config = OciConfig::new("https://xsp.example.com/");
        assert_eq!(
            config.service_location(),
            "https://xsp.example.com/webservice/services/ProvisioningService"
        );
        let config = config.with_location("http://127.0.0.1:8080/soap");
        assert_eq!(config.service_location(), "http://127.0.0.1:8080/soap");
    }

    #[test]
    fn test_defaults() {
        let config: OciConfig = serde_json::from_str(r#"{"base_url": "https://xsp"}"#).unwrap();
        assert_eq!(config.session_label, DEFAULT_SESSION_LABEL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.override_location.is_none());
    }

    #[test]
    fn test_sub_second_timeouts_round_up() {
        let config = OciConfig::new("https://xsp.example.com").with_timeouts(Duration::from_millis(500), Duration::from_millis(2500));
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(3));

        let config = config.with_timeouts(Duration::from_secs(4), Duration::ZERO);
        assert_eq!(config.connect_timeout(), Duration::from_secs(4));
        assert_eq!(config.request_timeout(), Duration::ZERO);
    }
}
