//! Per-user settings and the server data cached into them

use crate::error::BwksResult;
use bwks_request_core::{PropertyAccessor, PropertyValue};
use bwks_xml_core::{node_value, serialize, Document};
use bwks_xsi_core::XsiClient;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Access device name of the user's device of the selected type
pub const DEVICE_NAME: &str = "deviceName";
/// Device management config of that device, as XML text
pub const FILE_CONTENT: &str = "fileContent";
/// Device type selected for the user
pub const DEVICE_TYPE: &str = "deviceType";
/// Device management config fetched with the account data
pub const DM_CONFIG: &str = "dm_config";

const XMPP_CREDENTIALS: &str = "protocols/xmpp/credentials";

/// Properties resolved through XSI the first time they are read
pub const LAZY_PROPERTIES: &[&str] = &[DEVICE_NAME, FILE_CONTENT];

/// Settings held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryProperties {
    values: BTreeMap<String, PropertyValue>,
}

impl InMemoryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, names: &[&str]) {
        for name in names {
            self.values.remove(*name);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyAccessor for InMemoryProperties {
    fn get(&self, name: &str, default: PropertyValue) -> PropertyValue {
        self.values.get(name).cloned().unwrap_or(default)
    }

    fn set(&mut self, name: &str, value: PropertyValue) {
        self.values.insert(name.to_string(), value);
    }
}

fn is_stored(accessor: &dyn PropertyAccessor, name: &str) -> bool {
    !matches!(accessor.get(name, PropertyValue::Absent), PropertyValue::Absent)
}

/// Device type stored for the user, or `fallback`
pub fn device_type(accessor: &dyn PropertyAccessor, fallback: &str) -> String {
    match accessor.get(DEVICE_TYPE, PropertyValue::Absent) {
        PropertyValue::Text(device_type) if !device_type.is_empty() => device_type,
        _ => fallback.to_string(),
    }
}

/// Resolve `deviceName` or `fileContent` through XSI unless already stored
///
/// Other names and stored values are returned as they are. A resolved value
/// is written back to `accessor`.
pub async fn resolve_property(
    xsi: &XsiClient,
    accessor: &mut dyn PropertyAccessor,
    name: &str,
) -> BwksResult<PropertyValue> {
    if !LAZY_PROPERTIES.contains(&name) || is_stored(accessor, name) {
        return Ok(accessor.get(name, PropertyValue::Absent));
    }

    let device_type = device_type(accessor, &xsi.config().default_device_type);
    let value = if name == DEVICE_NAME {
        xsi.get_device_name_by_type(&device_type).await?
    } else {
        serialize(&xsi.get_dm_config(Some(&device_type), None).await?)?
    };
    debug!(property = name, device_type = %device_type, "property resolved");
    accessor.set(name, PropertyValue::Text(value.clone()));
    Ok(PropertyValue::Text(value))
}

/// Cache the user's directory entry and device management config
///
/// Outside UC-One SaaS the XMPP credentials of the config are stored as
/// `xmpp_username` and `xmpp_password` too.
pub async fn fetch_server_data(xsi: &XsiClient, accessor: &mut dyn PropertyAccessor) -> BwksResult<()> {
    let directory = xsi.get_directory_data().await?;
    for (field, value) in &directory {
        if let Some(value) = value {
            accessor.set(field, PropertyValue::text(value.as_str()));
        }
    }

    let dm_config = xsi.get_dm_config(None, None).await?;
    if !xsi.config().ucaas {
        for (key, value) in xmpp_credentials(&dm_config) {
            accessor.set(key, PropertyValue::Text(value));
        }
    }
    accessor.set(DM_CONFIG, PropertyValue::Text(serialize(&dm_config)?));
    info!(user = xsi.username(), fields = directory.len(), "account data cached");
    Ok(())
}

fn xmpp_credentials(dm_config: &Document) -> Vec<(&'static str, String)> {
    [("xmpp_username", "username"), ("xmpp_password", "password")]
        .into_iter()
        .map(|(key, field)| {
            let path = format!("{}/{}", XMPP_CREDENTIALS, field);
            (key, node_value(dm_config.root(), &path).unwrap_or_default())
        })
        .collect()
}
