//! Per-user property access
//!
//! The surrounding application owns user settings; binding only reads form
//! defaults through [`PropertyAccessor::get`] and echoes submitted values
//! back through [`PropertyAccessor::set`].

use crate::model::{ArgumentKind, DefaultValue, Request};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Checked(bool),
    Absent,
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> Self {
        PropertyValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the value is unset or an empty string
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Text(text) => text.is_empty(),
            PropertyValue::Checked(_) => false,
            PropertyValue::Absent => true,
        }
    }
}

impl From<DefaultValue> for PropertyValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Text(text) => PropertyValue::Text(text.to_string()),
            DefaultValue::Checked(checked) => PropertyValue::Checked(checked),
            DefaultValue::None => PropertyValue::Absent,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Checked(true) => f.write_str("on"),
            PropertyValue::Checked(false) => f.write_str("off"),
            PropertyValue::Absent => Ok(()),
        }
    }
}

/// Read/write access to one user's stored settings
pub trait PropertyAccessor: Send {
    /// Stored value for `name`, or `default` when nothing is stored
    fn get(&self, name: &str, default: PropertyValue) -> PropertyValue;

    /// Store a value
    fn set(&mut self, name: &str, value: PropertyValue);
}

/// Accessor that stores nothing and always answers with the default
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardProperties;

impl PropertyAccessor for DiscardProperties {
    fn get(&self, _name: &str, default: PropertyValue) -> PropertyValue {
        default
    }

    fn set(&mut self, _name: &str, _value: PropertyValue) {}
}

/// One pre-filled input of a request form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: ArgumentKind,
    pub description: &'static str,
    pub value: PropertyValue,
}

/// Pre-fill a form: the stored value of each argument, or its declared default
pub fn form_defaults(request: &Request, accessor: &dyn PropertyAccessor) -> Vec<FormField> {
    request
        .args
        .iter()
        .map(|arg| FormField {
            name: arg.name,
            kind: arg.kind,
            description: arg.description,
            value: accessor.get(arg.name, arg.default.into()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Argument, Protocol};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapProperties(HashMap<String, PropertyValue>);

    impl PropertyAccessor for MapProperties {
        fn get(&self, name: &str, default: PropertyValue) -> PropertyValue {
            self.0.get(name).cloned().unwrap_or(default)
        }

        fn set(&mut self, name: &str, value: PropertyValue) {
            self.0.insert(name.to_string(), value);
        }
    }

    static ARGS: &[Argument] = &[
        Argument::positional("deviceName", 0),
        Argument::positional("fileFormat", 3).with_default("config.xml"),
        Argument::flag("enabled", true),
    ];
    static REQUEST: Request = Request::new("x", "", "X", Protocol::Ocip, ARGS);

    #[test]
    fn test_form_defaults_prefers_stored_values() {
        let mut props = MapProperties::default();
        props.set("deviceName", "bcpc_alice".into());

        let fields = form_defaults(&REQUEST, &props);
        assert_eq!(fields[0].value, PropertyValue::text("bcpc_alice"));
        assert_eq!(fields[1].value, PropertyValue::text("config.xml"));
        assert_eq!(fields[2].value, PropertyValue::Checked(true));
    }

    #[test]
    fn test_discard_properties() {
        let mut props = DiscardProperties;
        props.set("a", "b".into());
        assert_eq!(props.get("a", PropertyValue::Absent), PropertyValue::Absent);
    }

    #[test]
    fn test_checked_display() {
        assert_eq!(PropertyValue::Checked(true).to_string(), "on");
        assert_eq!(PropertyValue::Checked(false).to_string(), "off");
    }
}
