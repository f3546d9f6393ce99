//! Group-scoped commands: access devices, numbers, domains

use super::table_rows;
use crate::client::OciClient;
use crate::command::CommandElement;
use crate::error::OciResult;
use crate::types::{AccessDeviceInfo, ConfigFileUpload};
use bwks_xml_core::{bool_to_str, node_value, node_values, Document};
use std::collections::BTreeMap;
use tracing::info;

fn device(name: &str) -> CommandElement {
    CommandElement::text("deviceName", name)
}

impl OciClient {
    /// Custom tag name to value
    pub async fn group_device_get_custom_tags(&mut self, device_name: &str) -> OciResult<BTreeMap<String, String>> {
        let response = self
            .send_group("GroupAccessDeviceCustomTagGetListRequest", &[device(device_name)])
            .await?;
        Ok(table_rows(response.root())
            .into_iter()
            .filter_map(|cols| {
                let mut cols = cols.into_iter();
                Some((cols.next()?, cols.next().unwrap_or_default()))
            })
            .collect())
    }

    pub async fn group_device_add_custom_tag(&mut self, device_name: &str, tag: &str, value: &str) -> OciResult<Document> {
        self.send_group(
            "GroupAccessDeviceCustomTagAddRequest",
            &[
                device(device_name),
                CommandElement::text("tagName", tag),
                CommandElement::text("tagValue", value),
            ],
        )
        .await
    }

    pub async fn group_device_delete_custom_tag(&mut self, device_name: &str, tag: &str) -> OciResult<Document> {
        self.send_group(
            "GroupAccessDeviceCustomTagDeleteListRequest",
            &[device(device_name), CommandElement::text("tagName", tag)],
        )
        .await
    }

    /// Switch a device's config file source, uploading content when given
    pub async fn group_device_modify_config_file(&mut self, upload: &ConfigFileUpload) -> OciResult<Document> {
        let mut elements = vec![
            device(&upload.device_name),
            CommandElement::text("fileFormat", upload.file_format.as_str()),
            CommandElement::text("fileSource", upload.file_source.as_str()),
        ];
        if !upload.file_content.is_empty() {
            elements.push(CommandElement::container("uploadFile"));
            elements.push(CommandElement::text("fileContent", upload.file_content.as_str()).under("uploadFile"));
        }
        elements.push(CommandElement::text(
            "extendedCaptureEnabled",
            bool_to_str(upload.extended_capture),
        ));
        info!(
            device = %upload.device_name,
            source = %upload.file_source,
            format = %upload.file_format,
            "modifying device config file"
        );
        self.send_group("GroupAccessDeviceFileModifyRequest14sp8", &elements)
            .await
    }

    pub async fn group_device_rebuild_config_file(&mut self, device_name: &str) -> OciResult<Document> {
        self.send_group("GroupCPEConfigRebuildDeviceConfigFileRequest", &[device(device_name)])
            .await
    }

    pub async fn group_get_available_numbers(&mut self) -> OciResult<Vec<String>> {
        let response = self.send_group("GroupDnGetAvailableListRequest", &[]).await?;
        let numbers: Vec<String> = response
            .root()
            .descendants()
            .into_iter()
            .filter(|e| e.local_name() == "phoneNumber")
            .map(|e| e.text().unwrap_or_default())
            .collect();
        info!(count = numbers.len(), "available numbers");
        Ok(numbers)
    }

    pub async fn activate_number(&mut self, phone_number: &str) -> OciResult<Document> {
        info!(phone_number, "activating number");
        self.send_group(
            "GroupDnActivateListRequest",
            &[CommandElement::text("phoneNumber", phone_number)],
        )
        .await
    }

    /// Domains assigned to the group, default domain first
    pub async fn group_get_assigned_domains(&mut self) -> OciResult<Vec<String>> {
        let response = self
            .send_group("GroupDomainGetAssignedListRequest", &[])
            .await?;
        let mut domains: Vec<String> = node_value(response.root(), "command/groupDefaultDomain")
            .filter(|domain| !domain.is_empty())
            .into_iter()
            .collect();
        domains.extend(node_values(response.root(), "command/domain"));
        info!(?domains, "assigned domains");
        Ok(domains)
    }

    /// Add a device with custom credentials
    pub async fn group_access_device_add(
        &mut self,
        device_name: &str,
        device_type: &str,
        user_name: &str,
        password: &str,
    ) -> OciResult<Document> {
        info!(device = device_name, device_type, "adding access device");
        self.send_group(
            "GroupAccessDeviceAddRequest14",
            &[
                device(device_name),
                CommandElement::text("deviceType", device_type),
                CommandElement::text("useCustomUserNamePassword", "true"),
                CommandElement::container("accessDeviceCredentials"),
                CommandElement::text("userName", user_name).under("accessDeviceCredentials"),
                CommandElement::text("password", password).under("accessDeviceCredentials"),
            ],
        )
        .await
    }

    pub async fn group_access_device_get(&mut self, device_name: &str) -> OciResult<AccessDeviceInfo> {
        let response = self
            .send_group("GroupAccessDeviceGetRequest18sp1", &[device(device_name)])
            .await?;
        Ok(AccessDeviceInfo {
            device_type: response.find_descendant("deviceType").and_then(|e| e.text()),
            user_name: response.find_descendant("userName").and_then(|e| e.text()),
        })
    }

    pub async fn group_access_device_delete(&mut self, device_name: &str) -> OciResult<Document> {
        info!(device = device_name, "deleting access device");
        self.send_group("GroupAccessDeviceDeleteRequest", &[device(device_name)])
            .await
    }
}
