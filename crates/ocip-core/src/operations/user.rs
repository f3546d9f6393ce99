//! User-level commands

use super::table_rows;
use crate::client::OciClient;
use crate::command::CommandElement;
use crate::error::{OciError, OciResult};
use crate::types::{NewUser, PrimaryDevice, UserData, VoiceManagement, USER_DATA_FIELDS};
use bwks_xml_core::{bool_to_str, node_value, Document};
use std::collections::BTreeMap;
use tracing::info;

/// Classification reported when a user has none
pub const UNCLASSIFIED: &str = "Unclassified";

fn user(user_id: &str) -> CommandElement {
    CommandElement::text("userId", user_id)
}

fn service_list(user_id: &str, services: &[&str]) -> Vec<CommandElement> {
    std::iter::once(user(user_id))
        .chain(services.iter().map(|s| CommandElement::text("serviceName", *s)))
        .collect()
}

impl OciClient {
    pub async fn user_get(&mut self, user_id: &str) -> OciResult<Document> {
        self.send("UserGetRequest21", &[user(user_id)]).await
    }

    /// Profile fields of a user; absent fields are left out
    pub async fn user_get_data(&mut self, user_id: &str) -> OciResult<UserData> {
        let response = self.user_get(user_id).await?;
        let mut data = UserData::new();
        data.insert("userId".to_string(), user_id.to_string());
        for field in USER_DATA_FIELDS {
            if let Some(element) = response.find_descendant(field) {
                data.insert(field.to_string(), element.text().unwrap_or_default());
            }
        }
        Ok(data)
    }

    /// Add a user, returning the profile as stored by the server
    pub async fn user_add(&mut self, new_user: &NewUser) -> OciResult<UserData> {
        let phone_number = match new_user.phone_number.as_deref().filter(|n| !n.is_empty()) {
            Some(number) => number.to_string(),
            None => self
                .group_get_available_numbers()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| OciError::missing_element("GroupDnGetAvailableListResponse", "phoneNumber"))?,
        };
        let extension: String = {
            let chars: Vec<char> = phone_number.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };
        let clid_last = non_empty_or(new_user.clid_last_name.as_deref(), &new_user.last_name);
        let clid_first = non_empty_or(new_user.clid_first_name.as_deref(), &new_user.first_name);

        self.send_group(
            "UserAddRequest17sp4",
            &[
                user(&new_user.user_id),
                CommandElement::text("lastName", new_user.last_name.as_str()),
                CommandElement::text("firstName", new_user.first_name.as_str()),
                CommandElement::text("callingLineIdLastName", clid_last),
                CommandElement::text("callingLineIdFirstName", clid_first),
                CommandElement::text("phoneNumber", phone_number.as_str()),
                CommandElement::text("extension", extension),
                CommandElement::text("password", new_user.password.as_str()),
            ],
        )
        .await?;

        let added = self.user_get_data(&new_user.user_id).await?;
        info!(user = %new_user.user_id, phone_number = %phone_number, "user added");
        Ok(added)
    }

    pub async fn user_delete(&mut self, user_id: &str) -> OciResult<Document> {
        let response = self.send("UserDeleteRequest", &[user(user_id)]).await?;
        info!(user = user_id, "user deleted");
        Ok(response)
    }

    /// Primary device of a user with its line port, `None` without one
    pub async fn user_get_primary_device(&mut self, user_id: &str) -> OciResult<Option<PrimaryDevice>> {
        let response = self.user_get(user_id).await?;
        let Some(endpoint) = response.find_descendant("accessDeviceEndpoint") else {
            return Ok(None);
        };
        let line_port = node_value(endpoint, "linePort").unwrap_or_default();
        let device_name = node_value(endpoint, "accessDevice/deviceName").unwrap_or_default();

        let device = self.group_access_device_get(&device_name).await?;
        Ok(Some(PrimaryDevice {
            device_name,
            line_port,
            device_type: device.device_type,
            user_name: device.user_name,
        }))
    }

    pub async fn user_get_network_conferencing_request(&mut self, user_id: &str) -> OciResult<Document> {
        self.send("UserNetworkConferencingGetRequest", &[user(user_id)])
            .await
    }

    /// Service name to assigned flag
    pub async fn user_get_assigned_services(&mut self, user_id: &str) -> OciResult<BTreeMap<String, bool>> {
        let response = self
            .send("UserServiceGetAssignmentListRequest", &[user(user_id)])
            .await?;
        let table = response
            .find_descendant("userServicesAssignmentTable")
            .ok_or_else(|| OciError::missing_element("UserServiceGetAssignmentListResponse", "userServicesAssignmentTable"))?;
        Ok(table_rows(table)
            .into_iter()
            .filter_map(|cols| {
                let mut cols = cols.into_iter();
                let name = cols.next()?;
                let assigned = cols.next().map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false);
                Some((name, assigned))
            })
            .collect())
    }

    pub async fn user_assign_service(&mut self, user_id: &str, services: &[&str]) -> OciResult<Document> {
        self.send("UserServiceAssignListRequest", &service_list(user_id, services))
            .await
    }

    pub async fn user_unassign_service(&mut self, user_id: &str, services: &[&str]) -> OciResult<Document> {
        self.send("UserServiceUnassignListRequest", &service_list(user_id, services))
            .await
    }

    /// Security classification, [`UNCLASSIFIED`] when none is set
    pub async fn user_get_security_classification(&mut self, user_id: &str) -> OciResult<String> {
        let response = self
            .send("UserSecurityClassificationGetRequest", &[user(user_id)])
            .await?;
        Ok(match response.find_descendant("securityClassification") {
            Some(element) => element.text().unwrap_or_default(),
            None => UNCLASSIFIED.to_string(),
        })
    }

    /// Set the classification; [`UNCLASSIFIED`] clears it
    pub async fn user_set_security_classification(&mut self, user_id: &str, level: &str) -> OciResult<Document> {
        let value = if level == UNCLASSIFIED { "" } else { level };
        self.send(
            "UserSecurityClassificationModifyRequest",
            &[user(user_id), CommandElement::text("securityClassification", value)],
        )
        .await
    }

    pub async fn user_set_integrated_imp(&mut self, user_id: &str, active: bool) -> OciResult<Document> {
        self.send(
            "UserIntegratedIMPModifyRequest",
            &[user(user_id), CommandElement::text("isActive", bool_to_str(active))],
        )
        .await
    }

    /// Turn Integrated IM&P on
    pub async fn activate_imp(&mut self, user_id: &str) -> OciResult<Document> {
        self.user_set_integrated_imp(user_id, true).await
    }

    pub async fn user_set_no_answer_number_of_rings(&mut self, user_id: &str, rings: u32) -> OciResult<Document> {
        self.send(
            "UserVoiceMessagingUserModifyGreetingRequest20",
            &[user(user_id), CommandElement::text("noAnswerNumberOfRings", rings.to_string())],
        )
        .await
    }

    pub async fn user_set_voice_management(
        &mut self,
        user_id: &str,
        active: bool,
        redirect: VoiceManagement,
    ) -> OciResult<Document> {
        self.send(
            "UserVoiceMessagingUserModifyVoiceManagementRequest",
            &[
                user(user_id),
                CommandElement::text("isActive", bool_to_str(active)),
                CommandElement::text("alwaysRedirectToVoiceMail", bool_to_str(redirect.always_redirect)),
                CommandElement::text("busyRedirectToVoiceMail", bool_to_str(redirect.busy_redirect)),
                CommandElement::text("noAnswerRedirectToVoiceMail", bool_to_str(redirect.no_answer_redirect)),
            ],
        )
        .await
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(fallback)
}
