//! Document edits behind the read-modify-write operations
//!
//! Every function takes the fetched document by reference and returns an
//! edited deep copy. `endpoint` only labels errors.

use crate::error::{XsiError, XsiResult};
use crate::types::{SimRingLocation, SimRingUpdate};
use bwks_xml_core::{bool_to_str, local_name, Document, Element, XML_SCHEMA_INSTANCE_NS};

/// `incomingCalls` text when calls should not ring while busy
pub const DO_NOT_RING_IF_ON_CALL: &str = "Do not Ring if on a Call";
/// `incomingCalls` text when every call rings
pub const RING_FOR_ALL_CALLS: &str = "Ring for all Incoming Calls";

/// Set the text of the first element named `local` anywhere in the document
pub fn set_descendant_text(
    doc: &Document,
    endpoint: &str,
    local: &str,
    text: &str,
) -> XsiResult<Document> {
    let mut copy = doc.clone();
    copy.find_descendant_mut(local)
        .ok_or_else(|| XsiError::missing_element(endpoint, local))?
        .set_text(text);
    Ok(copy)
}

/// Update the `active` flag and a forwarding number element
///
/// A missing number element is created as the second child. An empty number
/// is written as an empty element carrying `xsi:nil="true"`.
pub fn update_forward_number(
    doc: &Document,
    endpoint: &str,
    field: &str,
    active: bool,
    number: &str,
    ring_splash: Option<bool>,
) -> XsiResult<Document> {
    let mut copy = set_descendant_text(doc, endpoint, "active", bool_to_str(active))?;

    if copy.root().child(field).is_none() {
        let name = qualified(copy.root(), field);
        copy.root_mut().insert_child(1, Element::new(name));
    }

    let nil_prefix = if number.is_empty() {
        Some(schema_instance_prefix(&mut copy))
    } else {
        None
    };

    let element = copy
        .find_mut(field)
        .ok_or_else(|| XsiError::missing_element(endpoint, field))?;
    element.set_text(number);
    match nil_prefix {
        Some(prefix) => element.set_attribute(format!("{}:nil", prefix), "true"),
        None => clear_nil(element),
    }

    match ring_splash {
        Some(splash) => set_descendant_text(&copy, endpoint, "ringSplash", bool_to_str(splash)),
        None => Ok(copy),
    }
}

/// Apply a simultaneous ring update
///
/// With `locations: Some(vec![])` the `simRingLocations` element is emptied
/// and marked nil; a missing element is then left missing.
pub fn update_simultaneous_ring(
    doc: &Document,
    endpoint: &str,
    update: &SimRingUpdate,
) -> XsiResult<Document> {
    let mut copy = doc.clone();

    if let Some(active) = update.active {
        copy = set_descendant_text(&copy, endpoint, "active", bool_to_str(active))?;
    }
    if let Some(incoming) = update.incoming_calls {
        let text = if incoming {
            DO_NOT_RING_IF_ON_CALL
        } else {
            RING_FOR_ALL_CALLS
        };
        copy = set_descendant_text(&copy, endpoint, "incomingCalls", text)?;
    }

    let Some(locations) = &update.locations else {
        return Ok(copy);
    };

    if copy.root().child("simRingLocations").is_none() {
        if locations.is_empty() {
            return Ok(copy);
        }
        let name = qualified(copy.root(), "simRingLocations");
        copy.root_mut().insert_child(2, Element::new(name));
    }

    let nil_prefix = if locations.is_empty() {
        Some(schema_instance_prefix(&mut copy))
    } else {
        None
    };
    let prefix = copy.root().prefix().map(str::to_string);

    let container = copy
        .find_mut("simRingLocations")
        .ok_or_else(|| XsiError::missing_element(endpoint, "simRingLocations"))?;
    container.clear();
    match nil_prefix {
        Some(nil) => container.set_attribute(format!("{}:nil", nil), "true"),
        None => {
            for location in locations {
                container.push_child(location_element(prefix.as_deref(), location));
            }
        }
    }
    Ok(copy)
}

/// Drop the BroadWorks Anywhere `locations` element and turn off click-to-dial alerting
pub fn strip_anywhere_locations(doc: &Document, endpoint: &str) -> XsiResult<Document> {
    let mut copy = doc.clone();
    copy.root_mut().remove_child("locations");
    set_descendant_text(&copy, endpoint, "alertAllLocationsForClickToDialCalls", "false")
}

fn location_element(prefix: Option<&str>, location: &SimRingLocation) -> Element {
    let name = |local: &str| match prefix {
        Some(p) => format!("{}:{}", p, local),
        None => local.to_string(),
    };
    let mut element = Element::new(name("simRingLocation"));
    element.push_child(Element::with_text(name("address"), location.address.as_str()));
    element.push_child(Element::with_text(
        name("answerConfirmationRequired"),
        bool_to_str(location.answer_confirmation_required),
    ));
    element
}

// New children share the document element's namespace prefix
fn qualified(root: &Element, local: &str) -> String {
    match root.prefix() {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

// Prefix bound to the XML Schema instance namespace, declared on the root if needed
fn schema_instance_prefix(doc: &mut Document) -> String {
    let bound = doc
        .root()
        .attributes()
        .find(|(k, v)| *v == XML_SCHEMA_INSTANCE_NS && k.starts_with("xmlns:"))
        .map(|(k, _)| k["xmlns:".len()..].to_string());
    if let Some(prefix) = bound {
        return prefix;
    }

    let mut prefix = "xsi".to_string();
    let mut n = 0;
    while doc.root().attribute(&format!("xmlns:{}", prefix)).is_some() {
        prefix = format!("xsi{}", n);
        n += 1;
    }
    doc.declare_namespace(&prefix, XML_SCHEMA_INSTANCE_NS);
    prefix
}

fn clear_nil(element: &mut Element) {
    let nil_attrs: Vec<String> = element
        .attributes()
        .filter(|(k, _)| k.contains(':') && local_name(k) == "nil")
        .map(|(k, _)| k.to_string())
        .collect();
    for attr in nil_attrs {
        element.remove_attribute(&attr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwks_xml_core::{node_value, node_values, parse};

    const FORWARD: &str = r#"<CallForwardingAlways xmlns="http://schema.broadsoft.com/xsi">
        <active>true</active>
        <forwardToPhoneNumber>5551234</forwardToPhoneNumber>
        <ringSplash>false</ringSplash>
    </CallForwardingAlways>"#;

    const SIM_RING: &str = r#"<SimultaneousRingPersonal xmlns="http://schema.broadsoft.com/xsi">
        <active>true</active>
        <incomingCalls>Do not Ring if on a Call</incomingCalls>
        <simRingLocations>
            <simRingLocation><address>5551000</address><answerConfirmationRequired>false</answerConfirmationRequired></simRingLocation>
        </simRingLocations>
    </SimultaneousRingPersonal>"#;

    #[test]
    fn test_empty_number_gets_nil_marker() {
        let doc = parse(FORWARD).unwrap();
        let updated =
            update_forward_number(&doc, "services/callforwardingalways", "forwardToPhoneNumber", true, "", Some(true))
                .unwrap();
        let number = updated.find("forwardToPhoneNumber").unwrap();
        assert_eq!(number.text(), None);
        assert_eq!(number.attribute("xsi:nil"), Some("true"));
        assert_eq!(updated.root().attribute("xmlns:xsi"), Some(XML_SCHEMA_INSTANCE_NS));
        assert_eq!(node_value(updated.root(), "ringSplash").as_deref(), Some("true"));
        // fetched document untouched
        assert_eq!(node_value(doc.root(), "forwardToPhoneNumber").as_deref(), Some("5551234"));
    }

    #[test]
    fn test_missing_number_created_second() {
        let doc = parse(
            r#"<RemoteOffice xmlns="http://schema.broadsoft.com/xsi"><active>false</active><x/></RemoteOffice>"#,
        )
        .unwrap();
        let updated = update_forward_number(&doc, "services/remoteoffice", "remoteOfficeNumber", true, "5559999", None)
            .unwrap();
        let names: Vec<&str> = updated.root().children().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["active", "remoteOfficeNumber", "x"]);
        assert_eq!(node_value(updated.root(), "remoteOfficeNumber").as_deref(), Some("5559999"));
        assert_eq!(node_value(updated.root(), "active").as_deref(), Some("true"));
    }

    #[test]
    fn test_number_replaces_nil() {
        let doc = parse(
            r#"<a xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><active>false</active><n xsi:nil="true"/></a>"#,
        )
        .unwrap();
        let updated = update_forward_number(&doc, "e", "n", true, "123", None).unwrap();
        let n = updated.find("n").unwrap();
        assert_eq!(n.attribute("xsi:nil"), None);
        assert_eq!(n.text().as_deref(), Some("123"));
    }

    #[test]
    fn test_remove_all_sim_ring_locations() {
        let doc = parse(SIM_RING).unwrap();
        let updated =
            update_simultaneous_ring(&doc, "services/simultaneousringpersonal", &SimRingUpdate::remove_all()).unwrap();
        let locations = updated.find("simRingLocations").unwrap();
        assert_eq!(locations.child_count(), 0);
        assert_eq!(locations.attribute("nil"), Some("true"));
        assert_eq!(node_value(updated.root(), "active").as_deref(), Some("false"));
        assert_eq!(
            node_value(updated.root(), "incomingCalls").as_deref(),
            Some(RING_FOR_ALL_CALLS)
        );
    }

    #[test]
    fn test_sim_ring_locations_replaced() {
        let doc = parse(SIM_RING).unwrap();
        let update = SimRingUpdate {
            locations: Some(vec![
                SimRingLocation::new("5552000", true),
                SimRingLocation::new("5553000", false),
            ]),
            ..Default::default()
        };
        let updated = update_simultaneous_ring(&doc, "e", &update).unwrap();
        assert_eq!(
            node_values(updated.root(), "simRingLocations/simRingLocation/address"),
            vec!["5552000", "5553000"]
        );
        assert_eq!(node_value(updated.root(), "active").as_deref(), Some("true"));
    }

    #[test]
    fn test_sim_ring_container_created_at_index_two() {
        let doc = parse(
            r#"<x:SimultaneousRingPersonal xmlns:x="http://schema.broadsoft.com/xsi"><x:active>false</x:active><x:incomingCalls>Ring for all Incoming Calls</x:incomingCalls><x:tail/></x:SimultaneousRingPersonal>"#,
        )
        .unwrap();
        let update = SimRingUpdate {
            locations: Some(vec![SimRingLocation::new("5552000", false)]),
            ..Default::default()
        };
        let updated = update_simultaneous_ring(&doc, "e", &update).unwrap();
        let names: Vec<&str> = updated.root().children().map(|e| e.name()).collect();
        assert_eq!(names, vec!["x:active", "x:incomingCalls", "x:simRingLocations", "x:tail"]);

        let untouched = update_simultaneous_ring(&doc, "e", &SimRingUpdate::remove_all()).unwrap();
        assert!(untouched.find("simRingLocations").is_none());
    }

    #[test]
    fn test_strip_anywhere_locations() {
        let doc = parse(
            r#"<BroadWorksAnywhere xmlns="http://schema.broadsoft.com/xsi">
                <alertAllLocationsForClickToDialCalls>true</alertAllLocationsForClickToDialCalls>
                <alertAllLocationsForGroupPagingCalls>false</alertAllLocationsForGroupPagingCalls>
                <locations><location><phoneNumber>5551000</phoneNumber></location></locations>
            </BroadWorksAnywhere>"#,
        )
        .unwrap();
        let updated = strip_anywhere_locations(&doc, "services/broadworksanywhere").unwrap();
        assert!(updated.find("locations").is_none());
        assert_eq!(
            node_value(updated.root(), "alertAllLocationsForClickToDialCalls").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_missing_active_reported() {
        let doc = parse("<CallWaiting/>").unwrap();
        let err = set_descendant_text(&doc, "services/callwaiting", "active", "true").unwrap_err();
        assert!(matches!(err, XsiError::MissingElement { .. }));
    }
}
