//! Per-user call services under `services/`

use crate::client::XsiClient;
use crate::error::XsiResult;
use crate::types::{
    AnywhereState, DndState, FeatureRecord, ForwardType, ForwardingState, MobilityState, RecordingMode,
    RemoteOfficeState, SimRingState, SimRingUpdate,
};
use crate::updates::{
    set_descendant_text, strip_anywhere_locations, update_forward_number, update_simultaneous_ring,
    DO_NOT_RING_IF_ON_CALL,
};
use bwks_xml_core::{bool_to_str, node_list, node_value, str_to_bool};
use tracing::{debug, info};

const MUSIC_ON_HOLD: &str = "services/musiconhold";
const DO_NOT_DISTURB: &str = "services/donotdisturb";
const CALL_RECORDING: &str = "services/callrecording";
const REMOTE_OFFICE: &str = "services/remoteoffice";
const SIMULTANEOUS_RING: &str = "services/simultaneousringpersonal";
const ANYWHERE: &str = "services/broadworksanywhere";
const MOBILITY: &str = "services/broadworksmobility";
const ANONYMOUS_REJECTION: &str = "services/anonymouscallrejection";
const CALL_WAITING: &str = "services/callwaiting";
const AUTOMATIC_CALLBACK: &str = "services/automaticcallback";
const CLID_BLOCKING: &str = "services/callinglineiddeliveryblocking";
const INTEGRATED_IMP: &str = "services/integratedimp";

const FORWARD_NUMBER: &str = "forwardToPhoneNumber";
const REMOTE_OFFICE_NUMBER: &str = "remoteOfficeNumber";

fn flag(value: Option<String>) -> bool {
    value.as_deref().map(str_to_bool).unwrap_or(false)
}

impl XsiClient {
    async fn get_active_state(&self, endpoint: &str) -> XsiResult<bool> {
        let doc = self.get(endpoint).await?;
        Ok(flag(node_value(doc.root(), "active")))
    }

    async fn set_active_state(&self, endpoint: &str, enabled: bool) -> XsiResult<bool> {
        let doc = self.get(endpoint).await?;
        let updated = set_descendant_text(&doc, endpoint, "active", bool_to_str(enabled))?;
        debug!(endpoint, enabled, "setting service state");
        self.put(endpoint, &updated).await
    }

    pub async fn get_moh(&self) -> XsiResult<bool> {
        self.get_active_state(MUSIC_ON_HOLD).await
    }

    pub async fn set_moh(&self, enabled: bool) -> XsiResult<bool> {
        self.set_active_state(MUSIC_ON_HOLD, enabled).await
    }

    pub async fn get_dnd(&self) -> XsiResult<DndState> {
        let doc = self.get(DO_NOT_DISTURB).await?;
        Ok(DndState {
            active: flag(node_value(doc.root(), "active")),
            ring_splash: flag(node_value(doc.root(), "ringSplash")),
        })
    }

    /// Set do-not-disturb; `ring_splash: None` leaves the splash setting alone
    pub async fn set_dnd(&self, enabled: bool, ring_splash: Option<bool>) -> XsiResult<bool> {
        let doc = self.get(DO_NOT_DISTURB).await?;
        let mut updated = set_descendant_text(&doc, DO_NOT_DISTURB, "active", bool_to_str(enabled))?;
        if let Some(splash) = ring_splash {
            updated = set_descendant_text(&updated, DO_NOT_DISTURB, "ringSplash", bool_to_str(splash))?;
        }
        self.put(DO_NOT_DISTURB, &updated).await
    }

    pub async fn get_call_forwarding(&self, forward_type: ForwardType) -> XsiResult<ForwardingState> {
        let doc = self.get(&forward_type.endpoint()).await?;
        let ring_splash = forward_type
            .has_ring_splash()
            .then(|| flag(node_value(doc.root(), "ringSplash")));
        Ok(ForwardingState {
            active: flag(node_value(doc.root(), "active")),
            number: node_value(doc.root(), FORWARD_NUMBER).unwrap_or_default(),
            ring_splash,
        })
    }

    /// Set one call forwarding variant; an empty `number` clears it
    pub async fn set_call_forwarding(
        &self,
        forward_type: ForwardType,
        active: bool,
        number: &str,
        ring_splash: Option<bool>,
    ) -> XsiResult<bool> {
        let endpoint = forward_type.endpoint();
        let doc = self.get(&endpoint).await?;
        let updated = update_forward_number(&doc, &endpoint, FORWARD_NUMBER, active, number, ring_splash)?;
        info!(forward_type = %forward_type, active, "updating call forwarding");
        self.put(&endpoint, &updated).await
    }

    /// Deactivate every forwarding variant and clear its number
    pub async fn remove_call_forwards(&self) -> XsiResult<bool> {
        for forward_type in ForwardType::ALL {
            self.set_call_forwarding(forward_type, false, "", None).await?;
        }
        Ok(true)
    }

    pub async fn get_call_recording_mode(&self) -> XsiResult<Option<String>> {
        let doc = self.get(CALL_RECORDING).await?;
        Ok(node_value(doc.root(), "recordingMode"))
    }

    pub async fn set_call_recording_mode(&self, mode: RecordingMode) -> XsiResult<bool> {
        let doc = self.get(CALL_RECORDING).await?;
        let updated = set_descendant_text(&doc, CALL_RECORDING, "recordingMode", mode.as_str())?;
        self.put(CALL_RECORDING, &updated).await
    }

    pub async fn get_remote_office(&self) -> XsiResult<RemoteOfficeState> {
        let doc = self.get(REMOTE_OFFICE).await?;
        Ok(RemoteOfficeState {
            active: flag(node_value(doc.root(), "active")),
            number: node_value(doc.root(), REMOTE_OFFICE_NUMBER).unwrap_or_default(),
        })
    }

    pub async fn set_remote_office(&self, active: bool, number: &str) -> XsiResult<bool> {
        let doc = self.get(REMOTE_OFFICE).await?;
        let updated = update_forward_number(&doc, REMOTE_OFFICE, REMOTE_OFFICE_NUMBER, active, number, None)?;
        self.put(REMOTE_OFFICE, &updated).await
    }

    pub async fn get_simultaneous_ring(&self) -> XsiResult<SimRingState> {
        let doc = self.get(SIMULTANEOUS_RING).await?;
        Ok(SimRingState {
            active: flag(node_value(doc.root(), "active")),
            incoming_calls: node_value(doc.root(), "incomingCalls").as_deref() == Some(DO_NOT_RING_IF_ON_CALL),
            sim_ring_locations: doc
                .find_all("simRingLocations/simRingLocation")
                .into_iter()
                .map(node_list)
                .collect(),
        })
    }

    pub async fn set_simultaneous_ring(&self, update: &SimRingUpdate) -> XsiResult<bool> {
        let doc = self.get(SIMULTANEOUS_RING).await?;
        let updated = update_simultaneous_ring(&doc, SIMULTANEOUS_RING, update)?;
        self.put(SIMULTANEOUS_RING, &updated).await
    }

    /// Turn simultaneous ring off and drop every location
    pub async fn remove_simultaneous_ring(&self) -> XsiResult<bool> {
        self.set_simultaneous_ring(&SimRingUpdate::remove_all()).await
    }

    pub async fn get_broadworks_anywhere(&self) -> XsiResult<AnywhereState> {
        let doc = self.get(ANYWHERE).await?;
        Ok(AnywhereState {
            alert_all_locations_for_click_to_dial_calls: flag(node_value(
                doc.root(),
                "alertAllLocationsForClickToDialCalls",
            )),
            alert_all_locations_for_group_paging_calls: flag(node_value(
                doc.root(),
                "alertAllLocationsForGroupPagingCalls",
            )),
            locations: doc
                .find_all("locations/location")
                .into_iter()
                .map(node_list)
                .collect(),
        })
    }

    pub async fn get_broadworks_anywhere_location(&self, phone_number: &str) -> XsiResult<FeatureRecord> {
        let doc = self
            .get(&format!("{}/location/{}", ANYWHERE, phone_number))
            .await?;
        Ok(node_list(doc.root()))
    }

    pub async fn delete_broadworks_anywhere_location(&self, phone_number: &str) -> XsiResult<bool> {
        self.delete(&format!("{}/location/{}", ANYWHERE, phone_number))
            .await
    }

    /// Delete every location and turn off click-to-dial alerting
    ///
    /// The server refuses the PUT while locations without country codes are
    /// present, so they are deleted one by one and dropped from the document.
    pub async fn remove_broadworks_anywhere(&self) -> XsiResult<bool> {
        let doc = self.get(ANYWHERE).await?;
        let numbers: Vec<String> = doc
            .find_all("locations/location/phoneNumber")
            .into_iter()
            .filter_map(|e| e.text())
            .collect();
        for number in &numbers {
            self.delete_broadworks_anywhere_location(number).await?;
        }
        let updated = strip_anywhere_locations(&doc, ANYWHERE)?;
        info!(locations = numbers.len(), "BroadWorks Anywhere locations removed");
        self.put(ANYWHERE, &updated).await
    }

    /// Mobility state with the number of the primary mobile identity
    pub async fn get_broadworks_mobility(&self) -> XsiResult<MobilityState> {
        let doc = self.get(MOBILITY).await?;
        let mobile_number = doc
            .find_all("mobileIdentity")
            .into_iter()
            .find(|identity| node_value(identity, "primary").as_deref() == Some("true"))
            .and_then(|identity| node_value(identity, "mobileNumber"))
            .unwrap_or_default();
        Ok(MobilityState {
            active: flag(node_value(doc.root(), "active")),
            mobile_number,
        })
    }

    pub async fn get_anonymous_call_rejection(&self) -> XsiResult<bool> {
        self.get_active_state(ANONYMOUS_REJECTION).await
    }

    pub async fn set_anonymous_call_rejection(&self, enabled: bool) -> XsiResult<bool> {
        self.set_active_state(ANONYMOUS_REJECTION, enabled).await
    }

    pub async fn get_call_waiting(&self) -> XsiResult<bool> {
        self.get_active_state(CALL_WAITING).await
    }

    pub async fn set_call_waiting(&self, enabled: bool) -> XsiResult<bool> {
        self.set_active_state(CALL_WAITING, enabled).await
    }

    pub async fn get_automatic_callback(&self) -> XsiResult<bool> {
        self.get_active_state(AUTOMATIC_CALLBACK).await
    }

    pub async fn set_automatic_callback(&self, enabled: bool) -> XsiResult<bool> {
        self.set_active_state(AUTOMATIC_CALLBACK, enabled).await
    }

    pub async fn get_block_my_caller_id(&self) -> XsiResult<bool> {
        self.get_active_state(CLID_BLOCKING).await
    }

    pub async fn set_block_my_caller_id(&self, enabled: bool) -> XsiResult<bool> {
        self.set_active_state(CLID_BLOCKING, enabled).await
    }

    /// Enable or disable Integrated IM&P
    pub async fn set_imp(&self, enabled: bool) -> XsiResult<bool> {
        self.set_active_state(INTEGRATED_IMP, enabled).await
    }
}

