//! XSI request catalog and the handler bound to each request

use crate::client::XsiClient;
use crate::error::{XsiError, XsiResult};
use crate::types::{ForwardType, RecordingMode, SimRingUpdate};
use bwks_request_core::{Argument, BoundCall, Catalog, Handler, OperationTable, Outcome, Protocol, RegistryError, Request};
use futures::future::{BoxFuture, FutureExt};

/// Handler signature for XSI operations
pub type XsiHandler = Handler<XsiClient, XsiError>;

const NO_ARGS: &[Argument] = &[];
const ENABLED: &[Argument] = &[Argument::flag("enabled", true)];
const DM_CONFIG_ARGS: &[Argument] = &[Argument::keyword("deviceType")];
const DEVICE_NAME_ARGS: &[Argument] = &[Argument::positional("type", 0)];
const DND_ARGS: &[Argument] = &[Argument::flag("enabled", false), Argument::flag("ringSplash", false)];
const GET_FORWARDING_ARGS: &[Argument] = &[Argument::keyword("forward_type")
    .optional()
    .with_default("always")
    .describe("always | busy | noanswer | notreachable")];
const SET_FORWARDING_ARGS: &[Argument] = &[
    Argument::flag("active", false),
    Argument::keyword("number"),
    Argument::keyword("forward_type")
        .optional()
        .with_default("always")
        .describe("always | busy | noanswer | notreachable"),
    Argument::flag("ringSplash", false),
];
const RECORDING_ARGS: &[Argument] = &[Argument::keyword("mode")
    .with_default("never")
    .describe("on-demand-user-start | always-pause-resume | on-demand | never | always")];
const REMOTE_OFFICE_ARGS: &[Argument] = &[Argument::flag("active", false), Argument::keyword("number")];
const SIM_RING_ARGS: &[Argument] = &[Argument::flag("active", false), Argument::flag("incomingCalls", false)];
const PHONE_NUMBER_ARGS: &[Argument] = &[Argument::positional("phoneNumber", 0)];
const PN_REGISTRATION_ARGS: &[Argument] = &[
    Argument::positional("registrationId", 0),
    Argument::positional("token", 1),
];

const fn xsi(name: &'static str, endpoint: &'static str, display: &'static str, args: &'static [Argument]) -> Request {
    Request::new(name, endpoint, display, Protocol::Xsi, args)
}

/// Every XSI request, listed or not
pub static XSI_REQUESTS: &[Request] = &[
    xsi("get_dm_config", "profile/device", "Get config file", DM_CONFIG_ARGS),
    xsi("get_device_name_by_type", "profile/device", "Get device name by type", DEVICE_NAME_ARGS),
    xsi("get_directory_data", "directories/enterprise", "Get directory data", NO_ARGS),
    xsi("get_provisioned_devices", "profile/device", "Get provisioned devices", NO_ARGS),
    xsi("get_calls", "calls", "Get calls", NO_ARGS),
    xsi("hangup_calls", "calls", "Hangup calls", NO_ARGS),
    xsi("get_call_logs", "directories/calllogs", "Get call logs", NO_ARGS),
    xsi("delete_call_logs", "directories/calllogs", "Delete call logs", NO_ARGS),
    xsi("get_conference_calls", "calls/conference", "Get conference calls", NO_ARGS),
    xsi("hangup_conference_calls", "calls/conference", "Hangup conference calls", NO_ARGS),
    xsi("get_moh", "services/musiconhold", "Get moh", NO_ARGS),
    xsi("set_moh", "services/musiconhold", "Set moh", ENABLED),
    xsi("get_dnd", "services/donotdisturb", "Get dnd", NO_ARGS),
    xsi("set_dnd", "services/donotdisturb", "Set dnd", DND_ARGS),
    xsi("get_call_forwarding", "services/callforwarding", "Get call forwarding", GET_FORWARDING_ARGS),
    xsi("set_call_forwarding", "services/callforwarding", "Set call forwarding", SET_FORWARDING_ARGS),
    xsi("remove_call_forwards", "services/callforwarding", "Remove call forwards", NO_ARGS),
    xsi("get_call_recording_mode", "services/callrecording", "Get call recording mode", NO_ARGS),
    xsi("set_call_recording_mode", "services/callrecording", "Set call recording mode", RECORDING_ARGS),
    xsi("get_remote_office", "services/remoteoffice", "Get remote office", NO_ARGS),
    xsi("set_remote_office", "services/remoteoffice", "Set remote office", REMOTE_OFFICE_ARGS),
    xsi("get_simultaneous_ring", "services/simultaneousringpersonal", "Get simultaneous ring", NO_ARGS),
    xsi("set_simultaneous_ring", "services/simultaneousringpersonal", "Set simultaneous ring", SIM_RING_ARGS),
    xsi("remove_simultaneous_ring", "services/simultaneousringpersonal", "Remove simultaneous ring", NO_ARGS),
    xsi("get_broadworks_anywhere", "services/broadworksanywhere", "Get broadworks anywhere", NO_ARGS),
    xsi(
        "get_broadworks_anywhere_location",
        "services/broadworksanywhere/location",
        "Get broadworks anywhere location",
        PHONE_NUMBER_ARGS,
    ),
    xsi(
        "delete_broadworks_anywhere_location",
        "services/broadworksanywhere/location",
        "Delete broadworks anywhere location",
        PHONE_NUMBER_ARGS,
    ),
    xsi("remove_broadworks_anywhere", "services/broadworksanywhere", "Remove broadworks anywhere", NO_ARGS),
    xsi("get_broadworks_mobility", "services/broadworksmobility", "Get broadworks mobility", NO_ARGS),
    xsi(
        "get_anonymous_call_rejection",
        "services/anonymouscallrejection",
        "Get anonymous call rejection",
        NO_ARGS,
    ),
    xsi(
        "set_anonymous_call_rejection",
        "services/anonymouscallrejection",
        "Set anonymous call rejection",
        ENABLED,
    ),
    xsi("get_call_waiting", "services/callwaiting", "Get call waiting", NO_ARGS),
    xsi("set_call_waiting", "services/callwaiting", "Set call waiting", ENABLED),
    xsi("get_automatic_callback", "services/automaticcallback", "Get automatic callback", NO_ARGS),
    xsi("set_automatic_callback", "services/automaticcallback", "Set automatic callback", ENABLED),
    xsi(
        "get_block_my_caller_id",
        "services/callinglineiddeliveryblocking",
        "Get block my caller id",
        NO_ARGS,
    ),
    xsi(
        "set_block_my_caller_id",
        "services/callinglineiddeliveryblocking",
        "Set block my caller id",
        ENABLED,
    ),
    xsi("set_imp", "services/integratedimp", "Set imp", ENABLED),
    xsi("get_pn_registrations", "profile/PushNotificationRegistrations", "Get pn registrations", NO_ARGS),
    xsi(
        "delete_pn_registration",
        "profile/PushNotificationRegistrations",
        "Delete pn registration",
        PN_REGISTRATION_ARGS,
    ),
    xsi(
        "delete_pn_registrations",
        "profile/PushNotificationRegistrations",
        "Delete pn registrations",
        NO_ARGS,
    ),
];

/// Listing order; requests left out stay callable but are not offered
pub static XSI_ORDER: &[&str] = &[
    "get_dm_config",
    "get_device_name_by_type",
    "get_directory_data",
    "get_provisioned_devices",
    "get_calls",
    "hangup_calls",
    "get_call_logs",
    "delete_call_logs",
    "get_conference_calls",
    "hangup_conference_calls",
    "get_moh",
    "set_moh",
    "get_dnd",
    "set_dnd",
    "get_call_recording_mode",
    "get_remote_office",
    "remove_simultaneous_ring",
    "get_broadworks_anywhere",
    "remove_broadworks_anywhere",
    "get_broadworks_mobility",
    "get_anonymous_call_rejection",
    "set_anonymous_call_rejection",
    "get_call_waiting",
    "set_call_waiting",
    "get_automatic_callback",
    "set_automatic_callback",
    "get_block_my_caller_id",
    "set_block_my_caller_id",
    "set_imp",
    "get_pn_registrations",
    "delete_pn_registrations",
];

/// Validated XSI catalog
pub fn catalog() -> Result<Catalog, RegistryError> {
    Catalog::new(Protocol::Xsi, XSI_REQUESTS, XSI_ORDER)
}

/// XSI catalog with every request bound to its handler
pub fn operation_table() -> Result<OperationTable<XsiClient, XsiError>, RegistryError> {
    OperationTable::new(catalog()?, HANDLERS)
}

// `$body` runs with a shared borrow of the client and the bound call
macro_rules! xsi_handler {
    ($name:ident, |$client:ident, $call:ident| $body:expr) => {
        fn $name(client: &mut XsiClient, call: BoundCall) -> BoxFuture<'_, XsiResult<Outcome>> {
            #[allow(unused_variables)]
            async fn run($client: &XsiClient, $call: BoundCall) -> XsiResult<Outcome> {
                $body
            }
            run(client, call).boxed()
        }
    };
}

fn forward_type(call: &BoundCall) -> XsiResult<ForwardType> {
    match call.keyword_text("forward_type") {
        Some(text) if !text.is_empty() => text.parse(),
        _ => Ok(ForwardType::Always),
    }
}

fn recording_mode(call: &BoundCall) -> XsiResult<RecordingMode> {
    call.require_text("mode")?.parse()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

xsi_handler!(get_dm_config, |client, call| {
    let doc = client
        .get_dm_config(non_empty(call.keyword_text("deviceType")), None)
        .await?;
    Ok(Outcome::Document(doc))
});
xsi_handler!(get_device_name_by_type, |client, call| {
    Ok(Outcome::json(client.get_device_name_by_type(call.text_at(0)?).await?))
});
xsi_handler!(get_directory_data, |client, call| {
    Ok(Outcome::json(client.get_directory_data().await?))
});
xsi_handler!(get_provisioned_devices, |client, call| {
    Ok(Outcome::json(client.get_provisioned_devices().await?))
});
xsi_handler!(get_calls, |client, call| Ok(Outcome::Document(client.get_calls().await?)));
xsi_handler!(hangup_calls, |client, call| Ok(Outcome::json(client.hangup_calls().await?)));
xsi_handler!(get_call_logs, |client, call| Ok(Outcome::Document(client.get_call_logs().await?)));
xsi_handler!(delete_call_logs, |client, call| {
    client.delete_call_logs().await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_conference_calls, |client, call| {
    Ok(Outcome::Document(client.get_conference_calls().await?))
});
xsi_handler!(hangup_conference_calls, |client, call| {
    Ok(Outcome::json(client.hangup_conference_calls().await?))
});
xsi_handler!(get_moh, |client, call| Ok(Outcome::json(client.get_moh().await?)));
xsi_handler!(set_moh, |client, call| {
    client.set_moh(call.flag("enabled")).await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_dnd, |client, call| Ok(Outcome::json(client.get_dnd().await?)));
xsi_handler!(set_dnd, |client, call| {
    client
        .set_dnd(call.flag("enabled"), Some(call.flag("ringSplash")))
        .await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_call_forwarding, |client, call| {
    let forward_type = forward_type(&call)?;
    Ok(Outcome::json(client.get_call_forwarding(forward_type).await?))
});
xsi_handler!(set_call_forwarding, |client, call| {
    let forward_type = forward_type(&call)?;
    let ring_splash = forward_type.has_ring_splash().then(|| call.flag("ringSplash"));
    client
        .set_call_forwarding(
            forward_type,
            call.flag("active"),
            call.keyword_text("number").unwrap_or_default(),
            ring_splash,
        )
        .await?;
    Ok(Outcome::Done)
});
xsi_handler!(remove_call_forwards, |client, call| {
    client.remove_call_forwards().await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_call_recording_mode, |client, call| {
    Ok(Outcome::json(client.get_call_recording_mode().await?))
});
xsi_handler!(set_call_recording_mode, |client, call| {
    client.set_call_recording_mode(recording_mode(&call)?).await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_remote_office, |client, call| Ok(Outcome::json(client.get_remote_office().await?)));
xsi_handler!(set_remote_office, |client, call| {
    client
        .set_remote_office(call.flag("active"), call.keyword_text("number").unwrap_or_default())
        .await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_simultaneous_ring, |client, call| {
    Ok(Outcome::json(client.get_simultaneous_ring().await?))
});
xsi_handler!(set_simultaneous_ring, |client, call| {
    let update = SimRingUpdate {
        active: Some(call.flag("active")),
        incoming_calls: Some(call.flag("incomingCalls")),
        locations: None,
    };
    client.set_simultaneous_ring(&update).await?;
    Ok(Outcome::Done)
});
xsi_handler!(remove_simultaneous_ring, |client, call| {
    client.remove_simultaneous_ring().await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_broadworks_anywhere, |client, call| {
    Ok(Outcome::json(client.get_broadworks_anywhere().await?))
});
xsi_handler!(get_broadworks_anywhere_location, |client, call| {
    Ok(Outcome::json(client.get_broadworks_anywhere_location(call.text_at(0)?).await?))
});
xsi_handler!(delete_broadworks_anywhere_location, |client, call| {
    client.delete_broadworks_anywhere_location(call.text_at(0)?).await?;
    Ok(Outcome::Done)
});
xsi_handler!(remove_broadworks_anywhere, |client, call| {
    client.remove_broadworks_anywhere().await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_broadworks_mobility, |client, call| {
    Ok(Outcome::json(client.get_broadworks_mobility().await?))
});
xsi_handler!(get_anonymous_call_rejection, |client, call| {
    Ok(Outcome::json(client.get_anonymous_call_rejection().await?))
});
xsi_handler!(set_anonymous_call_rejection, |client, call| {
    client.set_anonymous_call_rejection(call.flag("enabled")).await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_call_waiting, |client, call| Ok(Outcome::json(client.get_call_waiting().await?)));
xsi_handler!(set_call_waiting, |client, call| {
    client.set_call_waiting(call.flag("enabled")).await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_automatic_callback, |client, call| {
    Ok(Outcome::json(client.get_automatic_callback().await?))
});
xsi_handler!(set_automatic_callback, |client, call| {
    client.set_automatic_callback(call.flag("enabled")).await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_block_my_caller_id, |client, call| {
    Ok(Outcome::json(client.get_block_my_caller_id().await?))
});
xsi_handler!(set_block_my_caller_id, |client, call| {
    client.set_block_my_caller_id(call.flag("enabled")).await?;
    Ok(Outcome::Done)
});
xsi_handler!(set_imp, |client, call| {
    client.set_imp(call.flag("enabled")).await?;
    Ok(Outcome::Done)
});
xsi_handler!(get_pn_registrations, |client, call| {
    Ok(Outcome::json(client.get_pn_registrations().await?))
});
xsi_handler!(delete_pn_registration, |client, call| {
    client
        .delete_pn_registration(call.text_at(0)?, call.text_at(1)?)
        .await?;
    Ok(Outcome::Done)
});
xsi_handler!(delete_pn_registrations, |client, call| {
    Ok(Outcome::json(client.delete_pn_registrations().await?))
});

static HANDLERS: &[(&str, XsiHandler)] = &[
    ("get_dm_config", get_dm_config),
    ("get_device_name_by_type", get_device_name_by_type),
    ("get_directory_data", get_directory_data),
    ("get_provisioned_devices", get_provisioned_devices),
    ("get_calls", get_calls),
    ("hangup_calls", hangup_calls),
    ("get_call_logs", get_call_logs),
    ("delete_call_logs", delete_call_logs),
    ("get_conference_calls", get_conference_calls),
    ("hangup_conference_calls", hangup_conference_calls),
    ("get_moh", get_moh),
    ("set_moh", set_moh),
    ("get_dnd", get_dnd),
    ("set_dnd", set_dnd),
    ("get_call_forwarding", get_call_forwarding),
    ("set_call_forwarding", set_call_forwarding),
    ("remove_call_forwards", remove_call_forwards),
    ("get_call_recording_mode", get_call_recording_mode),
    ("set_call_recording_mode", set_call_recording_mode),
    ("get_remote_office", get_remote_office),
    ("set_remote_office", set_remote_office),
    ("get_simultaneous_ring", get_simultaneous_ring),
    ("set_simultaneous_ring", set_simultaneous_ring),
    ("remove_simultaneous_ring", remove_simultaneous_ring),
    ("get_broadworks_anywhere", get_broadworks_anywhere),
    ("get_broadworks_anywhere_location", get_broadworks_anywhere_location),
    ("delete_broadworks_anywhere_location", delete_broadworks_anywhere_location),
    ("remove_broadworks_anywhere", remove_broadworks_anywhere),
    ("get_broadworks_mobility", get_broadworks_mobility),
    ("get_anonymous_call_rejection", get_anonymous_call_rejection),
    ("set_anonymous_call_rejection", set_anonymous_call_rejection),
    ("get_call_waiting", get_call_waiting),
    ("set_call_waiting", set_call_waiting),
    ("get_automatic_callback", get_automatic_callback),
    ("set_automatic_callback", set_automatic_callback),
    ("get_block_my_caller_id", get_block_my_caller_id),
    ("set_block_my_caller_id", set_block_my_caller_id),
    ("set_imp", set_imp),
    ("get_pn_registrations", get_pn_registrations),
    ("delete_pn_registration", delete_pn_registration),
    ("delete_pn_registrations", delete_pn_registrations),
];
