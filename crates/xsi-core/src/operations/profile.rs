//! Device profile, directory and push notification resources

use crate::client::XsiClient;
use crate::error::{XsiError, XsiResult};
use crate::types::{DeviceCredentials, DirectoryData, FeatureRecord};
use bwks_xml_core::{node_list, node_value, node_values, parse, Document, NodeValue};
use tracing::{debug, info};

const DEVICE_PROFILE: &str = "profile/device";
const PUSH_REGISTRATIONS: &str = "profile/PushNotificationRegistrations";
const DEFAULT_FILE_FORMAT: &str = "config.xml";

const DIRECTORY_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "number",
    "extension",
    "displayName",
    "emailAddress",
    "additionalDetails/impId",
    "bridgeId",
    "roomId",
    "groupId",
    "addressLine1",
    "city",
    "zip",
    "country",
];

/// Device management URL and credentials of the first device of `device_type`
pub fn device_credentials(profile: &Document, device_type: &str) -> XsiResult<DeviceCredentials> {
    profile
        .find_all("accessDevice")
        .into_iter()
        .find(|device| node_value(device, "deviceType").as_deref() == Some(device_type))
        .map(|device| DeviceCredentials {
            url: node_value(device, "deviceTypeUrl").unwrap_or_default(),
            username: node_value(device, "deviceUserNamePassword/userName").unwrap_or_default(),
            password: node_value(device, "deviceUserNamePassword/password").unwrap_or_default(),
        })
        .ok_or_else(|| XsiError::device_not_found(device_type))
}

/// Name of the first device whose type contains `device_type`
pub fn device_name_by_type(profile: &Document, device_type: &str) -> XsiResult<String> {
    profile
        .root()
        .descendants()
        .into_iter()
        .filter(|e| {
            e.child("deviceType")
                .and_then(|t| t.text())
                .map(|t| t.contains(device_type))
                .unwrap_or(false)
        })
        .find_map(|e| e.child("deviceName").and_then(|n| n.text()))
        .ok_or_else(|| XsiError::device_not_found(device_type))
}

/// Config file name for a device file format
fn config_file_name(file_format: &str, ucaas: bool) -> String {
    let stem = file_format.split('.').next().unwrap_or(file_format);
    let suffix = if ucaas { "-uc1s.xml" } else { ".xml" };
    format!("{}{}", stem, suffix)
}

impl XsiClient {
    /// Fetch the device management config of a provisioned device
    ///
    /// Device type defaults to the configured one and file format to
    /// `config.xml`. The file is fetched with the device's own Digest
    /// credentials.
    pub async fn get_dm_config(
        &self,
        device_type: Option<&str>,
        file_format: Option<&str>,
    ) -> XsiResult<Document> {
        let device_type = device_type.unwrap_or(&self.config().default_device_type);
        let profile = self.get(DEVICE_PROFILE).await?;
        let creds = device_credentials(&profile, device_type)?;

        let file_name = config_file_name(file_format.unwrap_or(DEFAULT_FILE_FORMAT), self.config().ucaas);
        let url = format!("{}{}", creds.url, file_name);
        info!(device_type, url = %url, "fetching device management config");

        let body = self
            .get_with_digest(&url, &creds.username, &creds.password)
            .await?;
        Ok(parse(&body)?)
    }

    pub async fn get_device_name_by_type(&self, device_type: &str) -> XsiResult<String> {
        let profile = self.get(DEVICE_PROFILE).await?;
        device_name_by_type(&profile, device_type)
    }

    /// Types of every device in the user's device profile
    pub async fn get_provisioned_devices(&self) -> XsiResult<Vec<String>> {
        let profile = self.get(DEVICE_PROFILE).await?;
        Ok(node_values(profile.root(), "accessDevice/deviceType"))
    }

    /// Enterprise directory entry of the user, plus `jid` mirroring `impId`
    pub async fn get_directory_data(&self) -> XsiResult<DirectoryData> {
        let endpoint = format!("directories/enterprise?userId={}", self.username());
        let doc = self.get(&endpoint).await?;

        let mut data = DirectoryData::new();
        for field in DIRECTORY_FIELDS {
            let key = field.rsplit('/').next().unwrap_or(field);
            let value = node_value(
                doc.root(),
                &format!("enterpriseDirectory/directoryDetails/{}", field),
            );
            data.insert(key.to_string(), value);
        }
        let jid = data.get("impId").cloned().flatten();
        data.insert("jid".to_string(), jid);
        debug!(fields = data.len(), "directory data loaded");
        Ok(data)
    }

    /// Push notification registrations, each with its device `token`
    pub async fn get_pn_registrations(&self) -> XsiResult<Vec<FeatureRecord>> {
        let doc = self.get(PUSH_REGISTRATIONS).await?;
        Ok(doc
            .find_all("pushNotificationRegistration")
            .into_iter()
            .map(|registration| {
                let mut record = node_list(registration);
                let token = node_value(registration, "deviceTokenList/deviceToken/token");
                record.insert("token".to_string(), NodeValue::from(token));
                record
            })
            .collect())
    }

    pub async fn delete_pn_registration(&self, registration_id: &str, token: &str) -> XsiResult<bool> {
        self.delete(&format!(
            "{}?registrationId={}&token={}",
            PUSH_REGISTRATIONS, registration_id, token
        ))
        .await
    }

    /// Delete every push notification registration; returns how many were removed
    pub async fn delete_pn_registrations(&self) -> XsiResult<usize> {
        let doc = self.get(PUSH_REGISTRATIONS).await?;
        let entries: Vec<(String, String)> = doc
            .find_all("pushNotificationRegistration")
            .into_iter()
            .map(|registration| {
                (
                    node_value(registration, "registrationId").unwrap_or_default(),
                    node_value(registration, "deviceTokenList/deviceToken/token").unwrap_or_default(),
                )
            })
            .collect();

        for (id, token) in &entries {
            self.delete_pn_registration(id, token).await?;
        }
        info!(count = entries.len(), "push notification registrations deleted");
        Ok(entries.len())
    }
}
