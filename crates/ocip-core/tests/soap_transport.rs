//! SOAP transport against a mock provisioning web service

use bwks_ocip_core::{OciConfig, OciError, OciTransport, SoapTransport};
use bwks_xml_core::parse;
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE: &str = "/webservice/services/ProvisioningService";

const COMMAND: &str = r#"<?xml version="1.0" encoding="UTF-8"?><BroadsoftDocument protocol="OCI" xmlns="C"><sessionId xmlns="">s1</sessionId><command xsi:type="AuthenticationRequest" xmlns=""><userId>admin</userId></command></BroadsoftDocument>"#;

const RETURN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
<soapenv:Body><processOCIMessageResponse><processOCIMessageReturn>&lt;BroadsoftDocument protocol=&quot;OCI&quot;&gt;&lt;sessionId&gt;s1&lt;/sessionId&gt;&lt;/BroadsoftDocument&gt;</processOCIMessageReturn></processOCIMessageResponse></soapenv:Body>
</soapenv:Envelope>"#;

const FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
<soapenv:Body><soapenv:Fault><faultcode>soapenv:Server</faultcode><faultstring>Session expired</faultstring></soapenv:Fault></soapenv:Body>
</soapenv:Envelope>"#;

fn transport(server: &MockServer) -> SoapTransport {
    SoapTransport::new(&OciConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn test_command_posted_as_escaped_in0() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SERVICE))
        .and(header("SOAPAction", "\"\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(RETURN))
        .expect(1)
        .mount(&server)
        .await;

    let reply = assert_ok!(transport(&server).process(COMMAND).await);
    assert_eq!(
        reply,
        r#"<BroadsoftDocument protocol="OCI"><sessionId>s1</sessionId></BroadsoftDocument>"#
    );

    let requests = server.received_requests().await.unwrap_or_default();
    let envelope = parse(&requests[0].body).unwrap();
    let in0 = envelope.find_descendant("in0").unwrap();
    assert_eq!(in0.text().as_deref(), Some(COMMAND));
    assert_eq!(in0.attribute("xsi:type"), Some("xsd:string"));
}

#[tokio::test]
async fn test_soap_fault_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(FAULT))
        .mount(&server)
        .await;

    let err = assert_err!(transport(&server).process(COMMAND).await);
    match err {
        OciError::Transport { message } => assert_eq!(message, "SOAP fault: Session expired"),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_xml_failure_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = assert_err!(transport(&server).process(COMMAND).await);
    assert!(err.to_string().contains("HTTP 503"));
}

#[test]
fn test_rejects_non_http_location() {
    let err = SoapTransport::new(&OciConfig::new("xsp.example.com").with_location("ftp://xsp")).unwrap_err();
    assert!(matches!(err, OciError::Config { .. }));
}
