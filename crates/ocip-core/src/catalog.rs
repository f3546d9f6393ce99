//! OCI-P request catalog and the handler bound to each request

use crate::client::OciClient;
use crate::error::{OciError, OciResult};
use crate::types::{ConfigFileUpload, NewUser};
use bwks_request_core::{Argument, BoundCall, Catalog, Handler, OperationTable, Outcome, Protocol, RegistryError, Request};
use bwks_xml_core::str_to_bool;
use futures::future::{BoxFuture, FutureExt};

/// Handler signature for OCI-P operations
pub type OciHandler = Handler<OciClient, OciError>;

const NO_ARGS: &[Argument] = &[];
const USER_ID: &[Argument] = &[Argument::positional("userId", 0)];
const DEVICE_NAME: &[Argument] = &[Argument::positional("deviceName", 0)];
const GET_CUSTOM_TAGS_ARGS: &[Argument] = &[Argument::positional("deviceName", 1)];
const ADD_CUSTOM_TAG_ARGS: &[Argument] = &[
    Argument::positional("deviceName", 0),
    Argument::positional("tagName", 1),
    Argument::positional("tagValue", 2),
];
const DELETE_CUSTOM_TAG_ARGS: &[Argument] = &[
    Argument::positional("deviceName", 0),
    Argument::positional("tagName", 1),
];
const MODIFY_CONFIG_FILE_ARGS: &[Argument] = &[
    Argument::positional("deviceName", 0),
    Argument::positional("fileSource", 1)
        .with_default("Custom")
        .describe("'Default' | 'Manual' | 'Custom'"),
    Argument::positional("fileContent", 2).text().encoded(),
    Argument::positional("fileFormat", 3).with_default("config.xml"),
    Argument::positional("extendedCaptureEnabled", 4)
        .with_default("false")
        .describe("true | false"),
];
const ADD_ACCESS_DEVICE_ARGS: &[Argument] = &[
    Argument::positional("deviceName", 0),
    Argument::positional("deviceType", 1),
    Argument::positional("userName", 2),
    Argument::positional("password", 3),
];
const USER_ADD_ARGS: &[Argument] = &[
    Argument::positional("userId", 0),
    Argument::positional("lastName", 1),
    Argument::positional("firstName", 2),
    Argument::positional("password", 3),
    Argument::positional("callingLineIdLastName", 4).optional().describe("optional"),
    Argument::positional("callingLineIdFirstName", 5).optional().describe("optional"),
    Argument::positional("phoneNumber", 6).optional().describe("optional"),
];
const SERVICE_ARGS: &[Argument] = &[
    Argument::positional("userId", 0),
    Argument::positional("serviceName", 1).describe("comma separated"),
];
const SECURITY_CLASSIFICATION_ARGS: &[Argument] = &[
    Argument::positional("userId", 0),
    Argument::positional("securityClassification", 1).with_default("Unclassified"),
];

const fn ocip(name: &'static str, command: &'static str, display: &'static str, args: &'static [Argument]) -> Request {
    Request::new(name, command, display, Protocol::Ocip, args)
}

/// Every OCI-P request, listed or not
pub static OCIP_REQUESTS: &[Request] = &[
    ocip(
        "group_device_modify_config_file",
        "GroupAccessDeviceFileModifyRequest14sp8",
        "Config / Modify config file",
        MODIFY_CONFIG_FILE_ARGS,
    ),
    ocip(
        "group_device_rebuild_config_file",
        "GroupCPEConfigRebuildDeviceConfigFileRequest",
        "Config / Rebuild config file",
        DEVICE_NAME,
    ),
    ocip(
        "group_device_get_custom_tags",
        "GroupAccessDeviceCustomTagGetListRequest",
        "Group / Get custom tags",
        GET_CUSTOM_TAGS_ARGS,
    ),
    ocip(
        "group_device_add_custom_tag",
        "GroupAccessDeviceCustomTagAddRequest",
        "Group / Add custom tag",
        ADD_CUSTOM_TAG_ARGS,
    ),
    ocip(
        "group_device_delete_custom_tag",
        "GroupAccessDeviceCustomTagDeleteListRequest",
        "Group / Delete custom tag",
        DELETE_CUSTOM_TAG_ARGS,
    ),
    ocip(
        "group_access_device_get",
        "GroupAccessDeviceGetRequest18sp1",
        "Group / Get access device",
        DEVICE_NAME,
    ),
    ocip(
        "group_access_device_add",
        "GroupAccessDeviceAddRequest14",
        "Group / Add access device",
        ADD_ACCESS_DEVICE_ARGS,
    ),
    ocip(
        "group_access_device_delete",
        "GroupAccessDeviceDeleteRequest",
        "Group / Delete access device",
        DEVICE_NAME,
    ),
    ocip(
        "group_get_assigned_domains",
        "GroupDomainGetAssignedListRequest",
        "Group / Get assigned domains",
        NO_ARGS,
    ),
    ocip(
        "group_get_available_numbers",
        "GroupDnGetAvailableListRequest",
        "Group / Get available numbers",
        NO_ARGS,
    ),
    ocip("user_add", "UserAddRequest17sp4", "User / Add", USER_ADD_ARGS),
    ocip("user_get", "UserGetRequest21", "User / Get", USER_ID),
    ocip("user_delete", "UserDeleteRequest", "User / Delete", USER_ID),
    ocip("user_get_data", "UserGetRequest21", "User / Get data", USER_ID),
    ocip(
        "user_get_primary_device",
        "UserGetRequest21",
        "User / Get primary device",
        USER_ID,
    ),
    ocip(
        "user_get_network_conferencing_request",
        "UserNetworkConferencingGetRequest",
        "User / Get network conferencing request",
        USER_ID,
    ),
    ocip(
        "user_get_assigned_services",
        "UserServiceGetAssignmentListRequest",
        "User / Get assigned services",
        USER_ID,
    ),
    ocip(
        "user_get_sca_list",
        "UserSharedCallAppearanceGetRequest16sp2",
        "User / Get sca list",
        USER_ID,
    ),
    ocip(
        "user_assign_service",
        "UserServiceAssignListRequest",
        "User / Assign service",
        SERVICE_ARGS,
    ),
    ocip(
        "user_unassign_service",
        "UserServiceUnassignListRequest",
        "User / Unassign service",
        SERVICE_ARGS,
    ),
    ocip(
        "user_get_security_classification",
        "UserSecurityClassificationGetRequest",
        "User / Get security classification",
        USER_ID,
    ),
    ocip(
        "user_set_security_classification",
        "UserSecurityClassificationModifyRequest",
        "User / Set security classification",
        SECURITY_CLASSIFICATION_ARGS,
    ),
];

/// Listing order; requests left out stay callable but are not offered
pub static OCIP_ORDER: &[&str] = &[
    "group_device_modify_config_file",
    "group_device_rebuild_config_file",
    "group_device_get_custom_tags",
    "group_device_add_custom_tag",
    "group_device_delete_custom_tag",
    "group_access_device_get",
    "group_access_device_add",
    "group_access_device_delete",
    "group_get_assigned_domains",
    "user_add",
    "user_get",
    "user_delete",
    "user_get_data",
    "user_get_primary_device",
    "user_get_network_conferencing_request",
    "user_get_assigned_services",
    "user_get_sca_list",
    "user_get_security_classification",
];

/// Validated OCI-P catalog
pub fn catalog() -> Result<Catalog, RegistryError> {
    Catalog::new(Protocol::Ocip, OCIP_REQUESTS, OCIP_ORDER)
}

/// OCI-P catalog with every request bound to its handler
pub fn operation_table() -> Result<OperationTable<OciClient, OciError>, RegistryError> {
    OperationTable::new(catalog()?, HANDLERS)
}

// `$body` runs with an exclusive borrow of the client and the bound call
macro_rules! ocip_handler {
    ($name:ident, |$client:ident, $call:ident| $body:expr) => {
        fn $name(client: &mut OciClient, call: BoundCall) -> BoxFuture<'_, OciResult<Outcome>> {
            #[allow(unused_variables)]
            async fn run($client: &mut OciClient, $call: BoundCall) -> OciResult<Outcome> {
                $body
            }
            run(client, call).boxed()
        }
    };
}

fn services(call: &BoundCall) -> OciResult<Vec<String>> {
    Ok(call
        .text_at(1)?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

fn config_file_upload(call: &BoundCall) -> OciResult<ConfigFileUpload> {
    Ok(ConfigFileUpload {
        device_name: call.text_at(0)?.to_string(),
        file_source: call.text_at(1)?.to_string(),
        file_content: call.optional_text_at(2).unwrap_or_default().to_string(),
        file_format: call.text_at(3)?.to_string(),
        extended_capture: str_to_bool(call.optional_text_at(4).unwrap_or_default()),
    })
}

fn new_user(call: &BoundCall) -> OciResult<NewUser> {
    Ok(NewUser {
        user_id: call.text_at(0)?.to_string(),
        last_name: call.text_at(1)?.to_string(),
        first_name: call.text_at(2)?.to_string(),
        password: call.text_at(3)?.to_string(),
        clid_last_name: call.optional_text_at(4).map(str::to_string),
        clid_first_name: call.optional_text_at(5).map(str::to_string),
        phone_number: call.optional_text_at(6).map(str::to_string),
    })
}

ocip_handler!(group_device_modify_config_file, |client, call| {
    let upload = config_file_upload(&call)?;
    Ok(Outcome::Document(client.group_device_modify_config_file(&upload).await?))
});
ocip_handler!(group_device_rebuild_config_file, |client, call| {
    Ok(Outcome::Document(client.group_device_rebuild_config_file(call.text_at(0)?).await?))
});
ocip_handler!(group_device_get_custom_tags, |client, call| {
    Ok(Outcome::json(client.group_device_get_custom_tags(call.text_at(0)?).await?))
});
ocip_handler!(group_device_add_custom_tag, |client, call| {
    let response = client
        .group_device_add_custom_tag(call.text_at(0)?, call.text_at(1)?, call.text_at(2)?)
        .await?;
    Ok(Outcome::Document(response))
});
ocip_handler!(group_device_delete_custom_tag, |client, call| {
    let response = client
        .group_device_delete_custom_tag(call.text_at(0)?, call.text_at(1)?)
        .await?;
    Ok(Outcome::Document(response))
});
ocip_handler!(group_access_device_get, |client, call| {
    Ok(Outcome::json(client.group_access_device_get(call.text_at(0)?).await?))
});
ocip_handler!(group_access_device_add, |client, call| {
    let response = client
        .group_access_device_add(call.text_at(0)?, call.text_at(1)?, call.text_at(2)?, call.text_at(3)?)
        .await?;
    Ok(Outcome::Document(response))
});
ocip_handler!(group_access_device_delete, |client, call| {
    Ok(Outcome::Document(client.group_access_device_delete(call.text_at(0)?).await?))
});
ocip_handler!(group_get_assigned_domains, |client, call| {
    Ok(Outcome::json(client.group_get_assigned_domains().await?))
});
ocip_handler!(group_get_available_numbers, |client, call| {
    Ok(Outcome::json(client.group_get_available_numbers().await?))
});
ocip_handler!(user_add, |client, call| {
    let user = new_user(&call)?;
    Ok(Outcome::json(client.user_add(&user).await?))
});
ocip_handler!(user_get, |client, call| Ok(Outcome::Document(client.user_get(call.text_at(0)?).await?)));
ocip_handler!(user_delete, |client, call| {
    Ok(Outcome::Document(client.user_delete(call.text_at(0)?).await?))
});
ocip_handler!(user_get_data, |client, call| {
    Ok(Outcome::json(client.user_get_data(call.text_at(0)?).await?))
});
ocip_handler!(user_get_primary_device, |client, call| {
    Ok(Outcome::json(client.user_get_primary_device(call.text_at(0)?).await?))
});
ocip_handler!(user_get_network_conferencing_request, |client, call| {
    let response = client
        .user_get_network_conferencing_request(call.text_at(0)?)
        .await?;
    Ok(Outcome::Document(response))
});
ocip_handler!(user_get_assigned_services, |client, call| {
    Ok(Outcome::json(client.user_get_assigned_services(call.text_at(0)?).await?))
});
ocip_handler!(user_get_sca_list, |client, call| {
    Ok(Outcome::json(client.user_get_sca_list(call.text_at(0)?).await?))
});
ocip_handler!(user_assign_service, |client, call| {
    let services = services(&call)?;
    let names: Vec<&str> = services.iter().map(String::as_str).collect();
    Ok(Outcome::Document(client.user_assign_service(call.text_at(0)?, &names).await?))
});
ocip_handler!(user_unassign_service, |client, call| {
    let services = services(&call)?;
    let names: Vec<&str> = services.iter().map(String::as_str).collect();
    Ok(Outcome::Document(client.user_unassign_service(call.text_at(0)?, &names).await?))
});
ocip_handler!(user_get_security_classification, |client, call| {
    Ok(Outcome::json(client.user_get_security_classification(call.text_at(0)?).await?))
});
ocip_handler!(user_set_security_classification, |client, call| {
    let response = client
        .user_set_security_classification(call.text_at(0)?, call.text_at(1)?)
        .await?;
    Ok(Outcome::Document(response))
});

static HANDLERS: &[(&str, OciHandler)] = &[
    ("group_device_modify_config_file", group_device_modify_config_file),
    ("group_device_rebuild_config_file", group_device_rebuild_config_file),
    ("group_device_get_custom_tags", group_device_get_custom_tags),
    ("group_device_add_custom_tag", group_device_add_custom_tag),
    ("group_device_delete_custom_tag", group_device_delete_custom_tag),
    ("group_access_device_get", group_access_device_get),
    ("group_access_device_add", group_access_device_add),
    ("group_access_device_delete", group_access_device_delete),
    ("group_get_assigned_domains", group_get_assigned_domains),
    ("group_get_available_numbers", group_get_available_numbers),
    ("user_add", user_add),
    ("user_get", user_get),
    ("user_delete", user_delete),
    ("user_get_data", user_get_data),
    ("user_get_primary_device", user_get_primary_device),
    ("user_get_network_conferencing_request", user_get_network_conferencing_request),
    ("user_get_assigned_services", user_get_assigned_services),
    ("user_get_sca_list", user_get_sca_list),
    ("user_assign_service", user_assign_service),
    ("user_unassign_service", user_unassign_service),
    ("user_get_security_classification", user_get_security_classification),
    ("user_set_security_classification", user_set_security_classification),
];

#[cfg(test)]
mod tests {
    use super::*;
    use bwks_request_core::{bind, form_inputs, DiscardProperties};

    #[test]
    fn test_every_request_has_a_handler() {
        let table = operation_table().unwrap();
        assert_eq!(table.catalog().len(), OCIP_REQUESTS.len());
        assert_eq!(table.catalog().iter_ordered().count(), OCIP_ORDER.len());
    }

    #[test]
    fn test_hidden_requests() {
        let catalog = catalog().unwrap();
        let mut hidden: Vec<&str> = catalog.hidden().map(|r| r.name).collect();
        hidden.sort();
        assert_eq!(
            hidden,
            vec![
                "group_get_available_numbers",
                "user_assign_service",
                "user_set_security_classification",
                "user_unassign_service",
            ]
        );
    }

    #[test]
    fn test_custom_tags_position_collapses_to_first() {
        let catalog = catalog().unwrap();
        let request = catalog.get("group_device_get_custom_tags").unwrap();
        let call = bind(request, &form_inputs([("deviceName", "pc1_bob")]), &mut DiscardProperties).unwrap();
        assert_eq!(call.text_at(0).unwrap(), "pc1_bob");
    }

    #[test]
    fn test_config_file_upload_is_base64() {
        let catalog = catalog().unwrap();
        let request = catalog.get("group_device_modify_config_file").unwrap();
        let inputs = form_inputs([
            ("deviceName", "pc1_bob"),
            ("fileSource", "Custom"),
            ("fileContent", "<config/>"),
            ("fileFormat", "config.xml"),
            ("extendedCaptureEnabled", "true"),
        ]);
        let call = bind(request, &inputs, &mut DiscardProperties).unwrap();
        let upload = config_file_upload(&call).unwrap();
        assert_eq!(upload.file_content, "PGNvbmZpZy8+");
        assert!(upload.extended_capture);
        assert_eq!(upload.file_source, "Custom");
    }

    #[test]
    fn test_user_add_optional_fields_absent_when_empty() {
        let catalog = catalog().unwrap();
        let request = catalog.get("user_add").unwrap();
        let inputs = form_inputs([
            ("userId", "bob@example.com"),
            ("lastName", "Builder"),
            ("firstName", "Bob"),
            ("password", "Welcom3"),
            ("callingLineIdLastName", ""),
            ("callingLineIdFirstName", "Robert"),
            ("phoneNumber", ""),
        ]);
        let call = bind(request, &inputs, &mut DiscardProperties).unwrap();
        let user = new_user(&call).unwrap();
        assert_eq!(user.clid_last_name, None);
        assert_eq!(user.clid_first_name.as_deref(), Some("Robert"));
        assert_eq!(user.phone_number, None);
    }

    #[test]
    fn test_services_split() {
        let call = BoundCall {
            positional: vec![
                bwks_request_core::BoundValue::Text("bob".into()),
                bwks_request_core::BoundValue::Text("Integrated IMP, Shared Call Appearance".into()),
            ],
            ..Default::default()
        };
        assert_eq!(
            services(&call).unwrap(),
            vec!["Integrated IMP".to_string(), "Shared Call Appearance".to_string()]
        );
    }
}
