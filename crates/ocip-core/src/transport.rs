//! Carrying OCI-P documents to the server
//!
//! [`SoapTransport`] posts each command to the provisioning web service's
//! `processOCIMessage` operation. [`ScriptedTransport`] answers from a queue
//! and records what was sent.

use crate::config::OciConfig;
use crate::error::{OciError, OciResult};
use async_trait::async_trait;
use bwks_xml_core::{parse, parse::to_xml_string, Document, Element};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_ENCODING_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";
const WEBSERVICE_NS: &str = "urn:com:broadsoft:webservice";

/// Exchanges one OCI-P document for the server's reply
#[async_trait]
pub trait OciTransport: Send + Sync {
    /// Send a serialized command document, returning the response document text
    async fn process(&self, message: &str) -> OciResult<String>;
}

/// SOAP 1.1 transport over HTTP(S)
pub struct SoapTransport {
    http: Client,
    location: String,
}

impl SoapTransport {
    pub fn new(config: &OciConfig) -> OciResult<Self> {
        let location = config.service_location();
        if !location.starts_with("http://") && !location.starts_with("https://") {
            return Err(OciError::config(format!("invalid service location '{}'", location)));
        }
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| OciError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, location })
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Debug for SoapTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoapTransport")
            .field("location", &self.location)
            .finish()
    }
}

#[async_trait]
impl OciTransport for SoapTransport {
    async fn process(&self, message: &str) -> OciResult<String> {
        let envelope = soap_envelope(message)?;
        debug!(location = %self.location, "posting processOCIMessage");

        let response = self
            .http
            .post(&self.location)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "SOAP response received");

        match parse(&body) {
            Ok(doc) => soap_return(&doc),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => {
                warn!(status = status.as_u16(), "SOAP request failed");
                Err(OciError::transport(format!(
                    "HTTP {} from {}: {}",
                    status.as_u16(),
                    self.location,
                    String::from_utf8_lossy(&body)
                )))
            }
        }
    }
}

/// Wrap an OCI-P document as the escaped `in0` of `processOCIMessage`
pub fn soap_envelope(message: &str) -> OciResult<String> {
    let mut in0 = Element::with_text("in0", message);
    in0.set_attribute("xsi:type", "xsd:string");

    let mut operation = Element::new("urn:processOCIMessage");
    operation.set_attribute("soapenv:encodingStyle", SOAP_ENCODING_NS);
    operation.push_child(in0);

    let mut body = Element::new("soapenv:Body");
    body.push_child(operation);

    let mut envelope = Element::new("soapenv:Envelope");
    envelope.set_attribute("xmlns:soapenv", SOAP_ENV_NS);
    envelope.set_attribute("xmlns:urn", WEBSERVICE_NS);
    envelope.set_attribute("xmlns:xsd", "http://www.w3.org/2001/XMLSchema");
    envelope.set_attribute("xmlns:xsi", bwks_xml_core::XML_SCHEMA_INSTANCE_NS);
    envelope.push_child(Element::new("soapenv:Header"));
    envelope.push_child(body);

    Ok(to_xml_string(&Document::new(envelope), false)?)
}

/// Text of `processOCIMessageReturn`, or the fault string as a transport error
pub fn soap_return(doc: &Document) -> OciResult<String> {
    if let Some(fault) = doc.find_descendant("Fault") {
        let reason = fault
            .find_descendant("faultstring")
            .and_then(|e| e.text())
            .unwrap_or_else(|| "unspecified SOAP fault".to_string());
        return Err(OciError::transport(format!("SOAP fault: {}", reason)));
    }
    doc.find_descendant("processOCIMessageReturn")
        .and_then(|e| e.text())
        .ok_or_else(|| OciError::missing_element("SOAP response", "processOCIMessageReturn"))
}

#[derive(Default)]
struct Script {
    replies: VecDeque<OciResult<String>>,
    sent: Vec<String>,
}

/// In-memory transport answering from a queue of canned replies
///
/// Clones share the queue, so a test can keep one handle and give another
/// to the client.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response document
    pub fn reply(&self, response: impl Into<String>) -> &Self {
        self.script.lock().replies.push_back(Ok(response.into()));
        self
    }

    /// Queue a transport failure
    pub fn fail(&self, error: OciError) -> &Self {
        self.script.lock().replies.push_back(Err(error));
        self
    }

    /// Every message sent so far
    pub fn sent(&self) -> Vec<String> {
        self.script.lock().sent.clone()
    }

    /// Replies not consumed yet
    pub fn pending(&self) -> usize {
        self.script.lock().replies.len()
    }
}

impl fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let script = self.script.lock();
        f.debug_struct("ScriptedTransport")
            .field("pending", &script.replies.len())
            .field("sent", &script.sent.len())
            .finish()
    }
}

#[async_trait]
impl OciTransport for ScriptedTransport {
    async fn process(&self, message: &str) -> OciResult<String> {
        let mut script = self.script.lock();
        script.sent.push(message.to_string());
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(OciError::transport("no scripted reply left")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_escapes_document() {
        let envelope = soap_envelope(r#"<BroadsoftDocument protocol="OCI"/>"#).unwrap();
        assert!(envelope.contains("<urn:processOCIMessage"));
        assert!(envelope.contains("&lt;BroadsoftDocument protocol=&quot;OCI&quot;/&gt;"));

        let doc = parse(&envelope).unwrap();
        assert_eq!(
            doc.find_descendant("in0").and_then(|e| e.text()).as_deref(),
            Some(r#"<BroadsoftDocument protocol="OCI"/>"#)
        );
    }

    #[test]
    fn test_soap_return_and_fault() {
        let ok = parse(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
                <soapenv:Body><ns1:processOCIMessageResponse xmlns:ns1="urn:com:broadsoft:webservice">
                <processOCIMessageReturn>&lt;BroadsoftDocument/&gt;</processOCIMessageReturn>
                </ns1:processOCIMessageResponse></soapenv:Body></soapenv:Envelope>"#,
        )
        .unwrap();
        assert_eq!(soap_return(&ok).unwrap(), "<BroadsoftDocument/>");

        let fault = parse(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
                <soapenv:Body><soapenv:Fault><faultcode>soapenv:Server</faultcode>
                <faultstring>Internal error</faultstring></soapenv:Fault></soapenv:Body></soapenv:Envelope>"#,
        )
        .unwrap();
        match soap_return(&fault) {
            Err(OciError::Transport { message }) => assert_eq!(message, "SOAP fault: Internal error"),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scripted_transport_records_and_drains() {
        let transport = ScriptedTransport::new();
        transport.reply("<a/>");
        let handle = transport.clone();

        assert_eq!(transport.process("first").await.unwrap(), "<a/>");
        assert!(matches!(transport.process("second").await, Err(OciError::Transport { .. })));
        assert_eq!(handle.sent(), vec!["first".to_string(), "second".to_string()]);
        assert_eq!(handle.pending(), 0);
    }
}
