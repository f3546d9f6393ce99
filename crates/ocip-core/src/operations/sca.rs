//! Shared call appearances and primary endpoints

use super::table_records;
use crate::client::OciClient;
use crate::command::{access_device_endpoint, CommandElement};
use crate::error::OciResult;
use crate::types::{ScaEndpointOptions, TableRecord};
use bwks_xml_core::{bool_to_str, Document};
use tracing::info;

const DEVICE_NAME_HEADING: &str = "Device Name";
const LINE_PORT_HEADING: &str = "Line/Port";

fn sca_endpoint(user_id: &str, device_name: &str, line_port: &str) -> Vec<CommandElement> {
    let mut elements = vec![CommandElement::text("userId", user_id)];
    elements.extend(access_device_endpoint(None, device_name, line_port));
    elements
}

impl OciClient {
    pub async fn user_sca_get(&mut self, user_id: &str) -> OciResult<Document> {
        self.send(
            "UserSharedCallAppearanceGetRequest21sp1",
            &[CommandElement::text("userId", user_id)],
        )
        .await
    }

    pub async fn user_sca_modify(
        &mut self,
        user_id: &str,
        allow_call_retrieve: bool,
        alert_all_for_click_to_dial: bool,
    ) -> OciResult<Document> {
        self.send(
            "UserSharedCallAppearanceModifyRequest",
            &[
                CommandElement::text("userId", user_id),
                CommandElement::text(
                    "alertAllAppearancesForClickToDialCalls",
                    bool_to_str(alert_all_for_click_to_dial),
                ),
                CommandElement::text("allowSCACallRetrieve", bool_to_str(allow_call_retrieve)),
            ],
        )
        .await
    }

    pub async fn user_sca_endpoint_add(
        &mut self,
        user_id: &str,
        device_name: &str,
        line_port: &str,
        options: ScaEndpointOptions,
    ) -> OciResult<Document> {
        info!(user = user_id, device = device_name, line_port, "adding SCA endpoint");
        let mut elements = sca_endpoint(user_id, device_name, line_port);
        elements.push(CommandElement::text("isActive", bool_to_str(options.is_active)));
        elements.push(CommandElement::text("allowOrigination", bool_to_str(options.allow_origination)));
        elements.push(CommandElement::text("allowTermination", bool_to_str(options.allow_termination)));
        self.send("UserSharedCallAppearanceAddEndpointRequest14sp2", &elements)
            .await
    }

    pub async fn user_sca_endpoint_get(&mut self, user_id: &str, device_name: &str, line_port: &str) -> OciResult<Document> {
        self.send(
            "UserSharedCallAppearanceGetEndpointRequest",
            &sca_endpoint(user_id, device_name, line_port),
        )
        .await
    }

    pub async fn user_sca_endpoint_delete(&mut self, user_id: &str, device_name: &str, line_port: &str) -> OciResult<Document> {
        info!(user = user_id, device = device_name, line_port, "deleting SCA endpoint");
        self.send(
            "UserSharedCallAppearanceDeleteEndpointListRequest14",
            &sca_endpoint(user_id, device_name, line_port),
        )
        .await
    }

    /// SCA devices of a user, each row keyed by column heading
    pub async fn user_get_sca_list(&mut self, user_id: &str) -> OciResult<Vec<TableRecord>> {
        let response = self
            .send(
                "UserSharedCallAppearanceGetRequest16sp2",
                &[CommandElement::text("userId", user_id)],
            )
            .await?;
        let devices = table_records(response.root());
        info!(user = user_id, devices = devices.len(), "SCA devices");
        Ok(devices)
    }

    /// Remove every SCA endpoint of a user and delete the devices behind them
    pub async fn user_delete_all_sca_devices(&mut self, user_id: &str) -> OciResult<()> {
        for record in self.user_get_sca_list(user_id).await? {
            let device_name = record.get(DEVICE_NAME_HEADING).map(String::as_str).unwrap_or_default();
            let line_port = record.get(LINE_PORT_HEADING).map(String::as_str).unwrap_or_default();
            self.user_sca_endpoint_delete(user_id, device_name, line_port)
                .await?;
            self.group_access_device_delete(device_name).await?;
        }
        Ok(())
    }

    pub async fn user_primary_endpoint_add(&mut self, user_id: &str, device_name: &str, line_port: &str) -> OciResult<Document> {
        info!(user = user_id, device = device_name, line_port, "adding primary endpoint");
        let mut elements = vec![
            CommandElement::text("userId", user_id),
            CommandElement::container("endpoint"),
        ];
        elements.extend(access_device_endpoint(Some("endpoint"), device_name, line_port));
        self.send("UserModifyRequest17sp4", &elements).await
    }

    pub async fn user_primary_endpoint_delete(&mut self, user_id: &str) -> OciResult<Document> {
        info!(user = user_id, "deleting primary endpoint");
        self.send(
            "UserModifyRequest17sp4",
            &[CommandElement::text("userId", user_id), CommandElement::text("endpoint", "")],
        )
        .await
    }

    /// Drop the primary device and every SCA device of a user
    pub async fn user_delete_all_devices(&mut self, user_id: &str) -> OciResult<()> {
        info!(user = user_id, "deleting all devices");
        if let Some(primary) = self.user_get_primary_device(user_id).await? {
            self.user_primary_endpoint_delete(user_id).await?;
            self.group_access_device_delete(&primary.device_name).await?;
        }
        self.user_delete_all_sca_devices(user_id).await
    }
}
