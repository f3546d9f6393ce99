//! Values passed to and returned from OCI-P operations

use serde::Serialize;
use std::collections::BTreeMap;

/// Fields read back from `UserGetRequest21`, keyed by element name
pub type UserData = BTreeMap<String, String>;

/// One row of an OCI table keyed by its column headings
pub type TableRecord = BTreeMap<String, String>;

/// User profile fields copied from `UserGetResponse21` when present
pub const USER_DATA_FIELDS: &[&str] = &[
    "serviceProviderId",
    "groupId",
    "userId",
    "lastName",
    "firstName",
    "callingLineIdLastName",
    "callingLineIdFirstName",
    "phoneNumber",
    "extension",
    "department",
    "title",
    "pagerPhoneNumber",
    "mobilePhoneNumber",
    "emailAddress",
    "yahooId",
    "addressLocation",
    "address",
    "countryCode",
    "nationalPrefix",
    "impId",
];

/// Device type and login of a group access device
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AccessDeviceInfo {
    pub device_type: Option<String>,
    pub user_name: Option<String>,
}

/// A user's primary device and the line port it is registered on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryDevice {
    pub device_name: String,
    pub line_port: String,
    pub device_type: Option<String>,
    pub user_name: Option<String>,
}

/// Input of `UserAddRequest17sp4`
///
/// Empty calling-line-ID names fall back to the plain names; a missing
/// phone number is taken from the group's available numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub user_id: String,
    pub last_name: String,
    pub first_name: String,
    pub password: String,
    pub clid_last_name: Option<String>,
    pub clid_first_name: Option<String>,
    pub phone_number: Option<String>,
}

impl NewUser {
    pub fn new(
        user_id: impl Into<String>,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_calling_line_id(mut self, last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        self.clid_last_name = Some(last_name.into());
        self.clid_first_name = Some(first_name.into());
        self
    }

    pub fn with_phone_number(mut self, number: impl Into<String>) -> Self {
        self.phone_number = Some(number.into());
        self
    }
}

/// Voice mail redirection flags of `UserVoiceMessagingUserModifyVoiceManagementRequest`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceManagement {
    pub always_redirect: bool,
    pub busy_redirect: bool,
    pub no_answer_redirect: bool,
}

impl Default for VoiceManagement {
    fn default() -> Self {
        Self {
            always_redirect: false,
            busy_redirect: true,
            no_answer_redirect: true,
        }
    }
}

/// Flags of a new shared call appearance endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaEndpointOptions {
    pub is_active: bool,
    pub allow_origination: bool,
    pub allow_termination: bool,
}

impl Default for ScaEndpointOptions {
    fn default() -> Self {
        Self {
            is_active: true,
            allow_origination: true,
            allow_termination: true,
        }
    }
}

/// New access device configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileUpload {
    pub device_name: String,
    /// `Default`, `Manual` or `Custom`
    pub file_source: String,
    /// Base64 content; empty sends no upload
    pub file_content: String,
    pub file_format: String,
    pub extended_capture: bool,
}

impl ConfigFileUpload {
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            file_source: "Default".to_string(),
            file_content: String::new(),
            file_format: "config.xml".to_string(),
            extended_capture: false,
        }
    }

    pub fn custom(device_name: impl Into<String>, base64_content: impl Into<String>) -> Self {
        Self {
            file_source: "Custom".to_string(),
            file_content: base64_content.into(),
            ..Self::new(device_name)
        }
    }
}

/// Primary device type of a new test user
pub const DEFAULT_PRIMARY_DEVICE: &str = "Polycom-550";

/// SCA device types of a new test user
pub const DEFAULT_SCA_DEVICES: &[&str] = &[
    "Business Communicator - PC",
    "Business Communicator - Mobile",
    "Business Communicator - Tablet",
    "Connect - Mobile",
    "Iris Messenger - Mobile",
];

/// Test user created in the admin's group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub primary_device: Option<String>,
    pub sca_devices: Vec<String>,
    /// Appended to both calling-line-ID names
    pub clid_suffix: String,
}

impl TestUser {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            primary_device: Some(DEFAULT_PRIMARY_DEVICE.to_string()),
            sca_devices: DEFAULT_SCA_DEVICES.iter().map(|d| d.to_string()).collect(),
            clid_suffix: String::new(),
        }
    }

    pub fn with_primary_device(mut self, device_type: Option<&str>) -> Self {
        self.primary_device = device_type.map(str::to_string);
        self
    }

    pub fn with_sca_devices<I, S>(mut self, device_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sca_devices = device_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clid_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.clid_suffix = suffix.into();
        self
    }

    /// `{last}{first}` lowercased without spaces
    pub fn user_part(&self) -> String {
        format!("{}{}", self.last_name, self.first_name)
            .to_lowercase()
            .replace(' ', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_user_defaults() {
        let user = TestUser::new("Alice", "Van Anderson", "Welcom3");
        assert_eq!(user.user_part(), "vanandersonalice");
        assert_eq!(user.primary_device.as_deref(), Some("Polycom-550"));
        assert_eq!(user.sca_devices.len(), 5);

        let user = user.with_primary_device(None).with_sca_devices(["Connect - Mobile"]);
        assert!(user.primary_device.is_none());
        assert_eq!(user.sca_devices, vec!["Connect - Mobile".to_string()]);
    }

    #[test]
    fn test_voice_management_defaults() {
        let flags = VoiceManagement::default();
        assert!(!flags.always_redirect);
        assert!(flags.busy_redirect && flags.no_answer_redirect);
    }
}
