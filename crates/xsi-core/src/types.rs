//! Values returned by and passed to XSI operations

use crate::error::{XsiError, XsiResult};
use bwks_xml_core::NodeValue;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flattened child elements of a feature entry (`node_list` output)
pub type FeatureRecord = BTreeMap<String, NodeValue>;

/// Enterprise directory fields of the signed-in user
pub type DirectoryData = BTreeMap<String, Option<String>>;

/// Device management endpoint and credentials of one access device
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCredentials {
    pub url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Call forwarding variants, each with its own service endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardType {
    Always,
    Busy,
    NoAnswer,
    NotReachable,
}

impl ForwardType {
    pub const ALL: [ForwardType; 4] = [
        ForwardType::Always,
        ForwardType::Busy,
        ForwardType::NoAnswer,
        ForwardType::NotReachable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardType::Always => "always",
            ForwardType::Busy => "busy",
            ForwardType::NoAnswer => "noanswer",
            ForwardType::NotReachable => "notreachable",
        }
    }

    pub fn endpoint(&self) -> String {
        format!("services/callforwarding{}", self.as_str())
    }

    /// Only unconditional forwarding carries a ring splash flag
    pub fn has_ring_splash(&self) -> bool {
        matches!(self, ForwardType::Always)
    }
}

impl FromStr for ForwardType {
    type Err = XsiError;

    fn from_str(s: &str) -> XsiResult<Self> {
        ForwardType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                XsiError::invalid_argument("forward_type", format!("'{}' is not always, busy, noanswer or notreachable", s))
            })
    }
}

impl fmt::Display for ForwardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call recording modes accepted by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordingMode {
    OnDemandUserStart,
    AlwaysPauseResume,
    OnDemand,
    Never,
    Always,
}

impl RecordingMode {
    pub const ALL: [RecordingMode; 5] = [
        RecordingMode::OnDemandUserStart,
        RecordingMode::AlwaysPauseResume,
        RecordingMode::OnDemand,
        RecordingMode::Never,
        RecordingMode::Always,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingMode::OnDemandUserStart => "on-demand-user-start",
            RecordingMode::AlwaysPauseResume => "always-pause-resume",
            RecordingMode::OnDemand => "on-demand",
            RecordingMode::Never => "never",
            RecordingMode::Always => "always",
        }
    }
}

impl FromStr for RecordingMode {
    type Err = XsiError;

    fn from_str(s: &str) -> XsiResult<Self> {
        RecordingMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| XsiError::invalid_argument("mode", format!("unknown recording mode '{}'", s)))
    }
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DndState {
    pub active: bool,
    pub ring_splash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardingState {
    pub active: bool,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_splash: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteOfficeState {
    pub active: bool,
    pub number: String,
}

/// One simultaneous ring destination to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimRingLocation {
    pub address: String,
    pub answer_confirmation_required: bool,
}

impl SimRingLocation {
    pub fn new(address: impl Into<String>, answer_confirmation_required: bool) -> Self {
        Self {
            address: address.into(),
            answer_confirmation_required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimRingState {
    pub active: bool,
    /// `true` when set to "Do not Ring if on a Call"
    pub incoming_calls: bool,
    pub sim_ring_locations: Vec<FeatureRecord>,
}

/// Fields of a simultaneous ring update; `None` leaves the field untouched
///
/// `locations: Some(vec![])` removes every location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimRingUpdate {
    pub active: Option<bool>,
    pub incoming_calls: Option<bool>,
    pub locations: Option<Vec<SimRingLocation>>,
}

impl SimRingUpdate {
    /// Update that switches the feature off and drops all locations
    pub fn remove_all() -> Self {
        Self {
            active: Some(false),
            incoming_calls: Some(false),
            locations: Some(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnywhereState {
    pub alert_all_locations_for_click_to_dial_calls: bool,
    pub alert_all_locations_for_group_paging_calls: bool,
    pub locations: Vec<FeatureRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilityState {
    pub active: bool,
    /// Number of the primary mobile identity, empty when none is primary
    pub mobile_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_type_parsing() {
        assert_eq!("noanswer".parse::<ForwardType>().unwrap(), ForwardType::NoAnswer);
        assert_eq!(ForwardType::Busy.endpoint(), "services/callforwardingbusy");
        assert!(matches!(
            "sometimes".parse::<ForwardType>(),
            Err(XsiError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_recording_mode_parsing() {
        for mode in RecordingMode::ALL {
            assert_eq!(mode.as_str().parse::<RecordingMode>().unwrap(), mode);
        }
        assert!("sometimes".parse::<RecordingMode>().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = DeviceCredentials {
            url: "https://dms/".into(),
            username: "dev".into(),
            password: "s3cret".into(),
        };
        assert!(!format!("{:?}", creds).contains("s3cret"));
    }
}
