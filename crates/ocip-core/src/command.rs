//! OCI-P command documents
//!
//! ```xml
//! <BroadsoftDocument protocol="OCI" xmlns="C" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
//!   <sessionId xmlns="">...</sessionId>
//!   <command xsi:type="UserGetRequest21" xmlns="">
//!     <userId>alice@example.com</userId>
//!   </command>
//! </BroadsoftDocument>
//! ```

use crate::error::{OciError, OciResult};
use bwks_xml_core::{parse::to_xml_string, Document, Element, XML_SCHEMA_INSTANCE_NS};

/// One element placed below `command`
///
/// `value: None` builds an empty container, `Some("")` an `xsi:nil` element,
/// anything else a text element. `parent` is a path below `command` naming a
/// container added earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandElement {
    pub tag: String,
    pub value: Option<String>,
    pub parent: Option<String>,
}

impl CommandElement {
    pub fn text(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: Some(value.into()),
            parent: None,
        }
    }

    pub fn container(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: None,
            parent: None,
        }
    }

    /// Place the element inside an earlier container
    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    fn build(&self) -> Element {
        let mut element = Element::new(self.tag.as_str());
        match self.value.as_deref() {
            None => {}
            Some("") => element.set_attribute("xsi:nil", "true"),
            Some(text) => element.set_text(text),
        }
        element
    }
}

/// `<accessDeviceEndpoint>` with a group-level device and line port
pub fn access_device_endpoint(root: Option<&str>, device_name: &str, line_port: &str) -> Vec<CommandElement> {
    let endpoint = match root {
        Some(root) => format!("{}/accessDeviceEndpoint", root),
        None => "accessDeviceEndpoint".to_string(),
    };
    let device = format!("{}/accessDevice", endpoint);
    let mut container = CommandElement::container("accessDeviceEndpoint");
    if let Some(root) = root {
        container = container.under(root);
    }
    vec![
        container,
        CommandElement::container("accessDevice").under(endpoint.as_str()),
        CommandElement::text("deviceLevel", "Group").under(device.as_str()),
        CommandElement::text("deviceName", device_name).under(device.as_str()),
        CommandElement::text("linePort", line_port).under(endpoint.as_str()),
    ]
}

/// Build a command document
pub fn build_command(session_id: &str, command_type: &str, elements: &[CommandElement]) -> OciResult<Document> {
    let mut command = Element::new("command");
    command.set_attribute("xsi:type", command_type);
    command.set_attribute("xmlns", "");

    for item in elements {
        let element = item.build();
        match item.parent.as_deref() {
            Some(parent) => {
                command
                    .find_mut(parent)
                    .ok_or_else(|| OciError::missing_element(command_type, parent))?
                    .push_child(element);
            }
            None => {
                command.push_child(element);
            }
        }
    }

    let mut session = Element::with_text("sessionId", session_id);
    session.set_attribute("xmlns", "");

    let mut root = Element::new("BroadsoftDocument");
    root.set_attribute("protocol", "OCI");
    root.set_attribute("xmlns", "C");
    root.set_attribute("xmlns:xsi", XML_SCHEMA_INSTANCE_NS);
    root.push_child(session);
    root.push_child(command);
    Ok(Document::new(root))
}

/// Single-line wire form of a command document
pub fn render(doc: &Document) -> OciResult<String> {
    Ok(to_xml_string(doc, false)?)
}

/// `type` attribute of the response `command` element
pub fn response_type(doc: &Document) -> Option<String> {
    doc.find_descendant("command")
        .and_then(|command| command.attribute("type"))
        .map(str::to_string)
}
