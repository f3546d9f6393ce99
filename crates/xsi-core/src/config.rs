//! XSI client configuration

use serde::Deserialize;
use std::time::Duration;

/// Device type used when a lookup does not name one
pub const DEFAULT_DEVICE_TYPE: &str = "Business Communicator - PC";

/// Configuration for [`crate::XsiClient`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct XsiConfig {
    /// XSP root URL, e.g. `https://xsp.example.com`
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
    pub accept_invalid_certs: bool,
    /// Fetch UC-One SaaS device configs (`-uc1s.xml`)
    pub ucaas: bool,
    pub default_device_type: String,
    pub user_agent: String,
}

impl Default for XsiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_redirects: 5,
            accept_invalid_certs: false,
            ucaas: false,
            default_device_type: DEFAULT_DEVICE_TYPE.to_string(),
            user_agent: concat!("bwks-xsi/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl XsiConfig {
    /// Configuration for one XSP server with default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout_secs = whole_secs(connect);
        self.request_timeout_secs = whole_secs(request);
        self
    }

    pub fn with_max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }

    pub fn with_ucaas(mut self, ucaas: bool) -> Self {
        self.ucaas = ucaas;
        self
    }

    pub fn with_default_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.default_device_type = device_type.into();
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

    /// Base URL without trailing slashes
    pub fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Seconds rounded up, so a sub-second timeout never becomes zero
fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
