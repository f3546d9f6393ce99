//! XSI client against a mock XSP server

use bwks_request_core::{form_inputs, DiscardProperties, FormInputs};
use bwks_xml_core::{node_value, node_values, parse, Document};
use bwks_xsi_core::{operation_table, XsiClient, XsiConfig, XsiError};
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const BASIC_AUTH: &str = "Basic YWxpY2U6c2VjcmV0";

fn user_path(endpoint: &str) -> String {
    format!("/com.broadsoft.xsi-actions/v2.0/user/alice/{}", endpoint)
}

fn client(server: &MockServer) -> XsiClient {
    XsiClient::new(XsiConfig::new(server.uri()), "alice", "secret").unwrap()
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(body)
}

async fn put_bodies(server: &MockServer) -> Vec<Document> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r: &&Request| r.method.as_str() == "PUT")
        .map(|r| parse(&r.body).unwrap())
        .collect()
}

const DND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DoNotDisturb xmlns="http://schema.broadsoft.com/xsi"><active>false</active><ringSplash>false</ringSplash></DoNotDisturb>"#;

#[tokio::test]
async fn test_put_redirect_retries_once_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("services/donotdisturb")))
        .respond_with(xml(DND))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(user_path("services/donotdisturb")))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/moved/donotdisturb", server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/moved/donotdisturb"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let accepted = assert_ok!(client(&server).set_dnd(true, None).await);
    assert!(accepted);

    let bodies = put_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(node_value(bodies[1].root(), "active").as_deref(), Some("true"));
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(user_path("directories/calllogs")))
        .respond_with(ResponseTemplate::new(307).insert_header("location", user_path("directories/calllogs")))
        .expect(3)
        .mount(&server)
        .await;

    let client = XsiClient::new(XsiConfig::new(server.uri()).with_max_redirects(2), "alice", "secret").unwrap();
    let err = assert_err!(client.delete_call_logs().await);
    assert!(matches!(err, XsiError::TooManyRedirects { hops: 2, .. }));
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("services/callwaiting")))
        .respond_with(ResponseTemplate::new(404).set_body_string("<ErrorInfo><summary>not assigned</summary></ErrorInfo>"))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get_call_waiting().await);
    assert_eq!(err.status(), Some(404));
    match err {
        XsiError::Http { body, .. } => assert!(body.contains("not assigned")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_forward_number_sent_as_nil() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("services/callforwardingalways")))
        .respond_with(xml(
            r#"<CallForwardingAlways xmlns="http://schema.broadsoft.com/xsi">
                <active>true</active>
                <forwardToPhoneNumber>5551234</forwardToPhoneNumber>
                <ringSplash>true</ringSplash>
            </CallForwardingAlways>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(user_path("services/callforwardingalways")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let table = operation_table().unwrap();
    let mut client = client(&server);
    let inputs = form_inputs([("active", "on"), ("number", ""), ("forward_type", "always")]);
    assert_ok!(
        table
            .dispatch(&mut client, "set_call_forwarding", &inputs, &mut DiscardProperties)
            .await
    );

    let bodies = put_bodies(&server).await;
    let number = bodies[0].find("forwardToPhoneNumber").unwrap();
    assert_eq!(number.text(), None);
    assert_eq!(number.attribute("xsi:nil"), Some("true"));
    assert_eq!(node_value(bodies[0].root(), "active").as_deref(), Some("true"));
    assert_eq!(node_value(bodies[0].root(), "ringSplash").as_deref(), Some("false"));
}

#[tokio::test]
async fn test_remove_simultaneous_ring_clears_locations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("services/simultaneousringpersonal")))
        .respond_with(xml(
            r#"<SimultaneousRingPersonal xmlns="http://schema.broadsoft.com/xsi">
                <active>true</active>
                <incomingCalls>Do not Ring if on a Call</incomingCalls>
                <simRingLocations>
                    <simRingLocation><address>5551000</address><answerConfirmationRequired>true</answerConfirmationRequired></simRingLocation>
                    <simRingLocation><address>5552000</address><answerConfirmationRequired>false</answerConfirmationRequired></simRingLocation>
                </simRingLocations>
            </SimultaneousRingPersonal>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(user_path("services/simultaneousringpersonal")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(client(&server).remove_simultaneous_ring().await);

    let bodies = put_bodies(&server).await;
    let locations = bodies[0].find("simRingLocations").unwrap();
    assert_eq!(locations.child_count(), 0);
    assert_eq!(locations.attribute("nil"), Some("true"));
    assert_eq!(
        node_value(bodies[0].root(), "incomingCalls").as_deref(),
        Some("Ring for all Incoming Calls")
    );
}

fn device_profile(dms: &str) -> String {
    format!(
        r#"<AccessDevices xmlns="http://schema.broadsoft.com/xsi">
            <accessDevice>
                <deviceType>Business Communicator - PC</deviceType>
                <deviceName>alice_pc</deviceName>
                <deviceTypeUrl>{dms}/dms/bc/pc/</deviceTypeUrl>
                <deviceUserNamePassword><userName>pc-user</userName><password>pc-pass</password></deviceUserNamePassword>
            </accessDevice>
            <accessDevice>
                <deviceType>Polycom-550</deviceType>
                <deviceName>alice_polycom</deviceName>
                <deviceTypeUrl>{dms}/dms/PolycomIP550/</deviceTypeUrl>
                <deviceUserNamePassword><userName>poly-user</userName><password>poly-pass</password></deviceUserNamePassword>
            </accessDevice>
        </AccessDevices>"#,
        dms = dms
    )
}

#[tokio::test]
async fn test_device_lookup_by_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("profile/device")))
        .respond_with(xml(&device_profile(&server.uri())))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.get_device_name_by_type("Polycom-550").await.unwrap(), "alice_polycom");
    assert_eq!(
        client.get_provisioned_devices().await.unwrap(),
        vec!["Business Communicator - PC", "Polycom-550"]
    );

    let err = assert_err!(client.get_dm_config(Some("Yealink-T46"), None).await);
    assert!(matches!(err, XsiError::DeviceNotFound { ref device_type } if device_type == "Yealink-T46"));
}

#[tokio::test]
async fn test_dm_config_fetched_with_digest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("profile/device")))
        .respond_with(xml(&device_profile(&server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dms/PolycomIP550/config.xml"))
        .and(header_exists("authorization"))
        .respond_with(xml(r#"<config><sip><proxy>sip.example.com</proxy></sip></config>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dms/PolycomIP550/config.xml"))
        .respond_with(ResponseTemplate::new(401).insert_header(
            "www-authenticate",
            r#"Digest realm="dms", qop="auth", nonce="4f1d2e", opaque="0a0b""#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = assert_ok!(client(&server).get_dm_config(Some("Polycom-550"), None).await);
    assert_eq!(node_value(config.root(), "sip/proxy").as_deref(), Some("sip.example.com"));

    let requests = server.received_requests().await.unwrap_or_default();
    let authorized = requests
        .iter()
        .filter_map(|r| r.headers.get("authorization"))
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("Digest"))
        .unwrap()
        .to_string();
    assert!(authorized.contains(r#"username="poly-user""#));
    assert!(authorized.contains(r#"uri="/dms/PolycomIP550/config.xml""#));
    assert!(authorized.contains("qop=auth"));
}

#[tokio::test]
async fn test_hangup_releases_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("calls")))
        .respond_with(xml(
            r#"<Calls xmlns="http://schema.broadsoft.com/xsi">
                <call><callId>callhalf-1:0</callId></call>
                <call><callId>callhalf-2:0</callId></call>
            </Calls>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(user_path("calls/callhalf-1:0")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(user_path("calls/callhalf-2:0")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let released = client(&server).hangup_calls().await.unwrap();
    assert_eq!(released, vec!["callhalf-1:0", "callhalf-2:0"]);
}

#[tokio::test]
async fn test_remove_broadworks_anywhere() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(user_path("services/broadworksanywhere")))
        .respond_with(xml(
            r#"<BroadWorksAnywhere xmlns="http://schema.broadsoft.com/xsi">
                <alertAllLocationsForClickToDialCalls>true</alertAllLocationsForClickToDialCalls>
                <alertAllLocationsForGroupPagingCalls>false</alertAllLocationsForGroupPagingCalls>
                <locations>
                    <location><phoneNumber>5551000</phoneNumber><active>true</active></location>
                </locations>
            </BroadWorksAnywhere>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(user_path("services/broadworksanywhere/location/5551000")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(user_path("services/broadworksanywhere")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(client(&server).remove_broadworks_anywhere().await);

    let bodies = put_bodies(&server).await;
    assert!(bodies[0].find("locations").is_none());
    assert_eq!(
        node_values(bodies[0].root(), "alertAllLocationsForClickToDialCalls"),
        vec!["false"]
    );
}

#[tokio::test]
async fn test_dispatch_reports_missing_argument() {
    let server = MockServer::start().await;
    let table = operation_table().unwrap();
    let mut client = client(&server);

    let err = assert_err!(
        table
            .dispatch(&mut client, "get_device_name_by_type", &FormInputs::new(), &mut DiscardProperties)
            .await
    );
    assert!(err.is_recoverable());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
