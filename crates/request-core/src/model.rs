//! Request and argument descriptors
//!
//! Descriptors are plain data built in `const` context so each client crate
//! can declare its catalog as a static table:
//!
//! ```rust
//! use bwks_request_core::{Argument, Protocol, Request};
//!
//! static ARGS: &[Argument] = &[
//!     Argument::positional("deviceName", 0),
//!     Argument::positional("fileSource", 1)
//!         .with_default("Custom")
//!         .describe("'Default' | 'Manual' | 'Custom'"),
//! ];
//!
//! static REQUEST: Request = Request::new(
//!     "group_device_modify_config_file",
//!     "GroupAccessDeviceFileModifyRequest14sp8",
//!     "Config / Modify config file",
//!     Protocol::Ocip,
//!     ARGS,
//! );
//!
//! assert_eq!(REQUEST.args.len(), 2);
//! ```

use crate::error::RegistryError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Wire protocol a request is sent over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ocip,
    Xsi,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ocip => "ocip",
            Protocol::Xsi => "xsi",
        }
    }
}

impl FromStr for Protocol {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ocip" => Ok(Protocol::Ocip),
            "xsi" => Ok(Protocol::Xsi),
            other => Err(RegistryError::UnknownProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input kind of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    /// Single line text
    String,
    /// Multi-line text, e.g. a config file body
    Text,
    /// Checkbox; always sent as `true`/`false`
    Bool,
}

/// Declared default of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Text(&'static str),
    Checked(bool),
    None,
}

/// Where a bound argument goes in the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Position {
    /// Ordinal in the positional list; gaps collapse during assembly
    Index(u8),
    /// Named entry in the keyword bag
    Keyword,
}

/// One input of a remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: &'static str,
    pub default: DefaultValue,
    pub kind: ArgumentKind,
    pub position: Position,
    pub encode: bool,
    pub optional: bool,
    pub description: &'static str,
}

impl Argument {
    /// Required string argument at a positional index
    pub const fn positional(name: &'static str, index: u8) -> Self {
        Self {
            name,
            default: DefaultValue::Text(""),
            kind: ArgumentKind::String,
            position: Position::Index(index),
            encode: false,
            optional: false,
            description: "",
        }
    }

    /// Required string argument passed by name
    pub const fn keyword(name: &'static str) -> Self {
        Self {
            position: Position::Keyword,
            ..Self::positional(name, 0)
        }
    }

    /// Checkbox argument passed by name
    pub const fn flag(name: &'static str, checked: bool) -> Self {
        Self {
            default: DefaultValue::Checked(checked),
            kind: ArgumentKind::Bool,
            ..Self::keyword(name)
        }
    }

    pub const fn with_default(self, value: &'static str) -> Self {
        Self {
            default: DefaultValue::Text(value),
            ..self
        }
    }

    /// Multi-line text input
    pub const fn text(self) -> Self {
        Self {
            kind: ArgumentKind::Text,
            ..self
        }
    }

    /// Base64-encode the value before sending
    pub const fn encoded(self) -> Self {
        Self {
            encode: true,
            ..self
        }
    }

    /// Empty input falls back to the default, which is absent unless set later
    pub const fn optional(self) -> Self {
        Self {
            optional: true,
            default: DefaultValue::None,
            ..self
        }
    }

    pub const fn describe(self, description: &'static str) -> Self {
        Self {
            description,
            ..self
        }
    }

    pub fn is_bool(&self) -> bool {
        self.kind == ArgumentKind::Bool
    }
}

/// A remote operation: its dispatch name, wire name, label and arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Request {
    /// Name of the client operation that serves the request
    pub name: &'static str,
    /// OCI-P command type or XSI endpoint hint; may be empty
    pub wire_name: &'static str,
    pub display_name: &'static str,
    pub protocol: Protocol,
    pub args: &'static [Argument],
}

impl Request {
    pub const fn new(
        name: &'static str,
        wire_name: &'static str,
        display_name: &'static str,
        protocol: Protocol,
        args: &'static [Argument],
    ) -> Self {
        Self {
            name,
            wire_name,
            display_name,
            protocol,
            args,
        }
    }

    /// Build a request from a textual protocol tag, failing on anything but `ocip`/`xsi`
    pub fn with_protocol_tag(
        name: &'static str,
        wire_name: &'static str,
        display_name: &'static str,
        protocol: &str,
        args: &'static [Argument],
    ) -> Result<Self, RegistryError> {
        Ok(Self::new(name, wire_name, display_name, protocol.parse()?, args))
    }

    /// Argument by name
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name == name)
    }

    /// First positional index claimed twice, if any
    pub fn position_collision(&self) -> Option<u8> {
        let mut seen = [false; 256];
        for arg in self.args {
            if let Position::Index(idx) = arg.position {
                if seen[idx as usize] {
                    return Some(idx);
                }
                seen[idx as usize] = true;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ARGS: &[Argument] = &[
        Argument::positional("userId", 0),
        Argument::positional("phoneNumber", 1).optional().describe("optional"),
        Argument::flag("enabled", true),
        Argument::positional("fileContent", 2).text().encoded(),
    ];

    #[test]
    fn test_builders() {
        assert_eq!(ARGS[0].position, Position::Index(0));
        assert_eq!(ARGS[0].default, DefaultValue::Text(""));
        assert!(ARGS[1].optional);
        assert_eq!(ARGS[1].default, DefaultValue::None);
        assert_eq!(ARGS[1].description, "optional");
        assert_eq!(ARGS[2].kind, ArgumentKind::Bool);
        assert_eq!(ARGS[2].position, Position::Keyword);
        assert_eq!(ARGS[2].default, DefaultValue::Checked(true));
        assert!(ARGS[3].encode);
        assert_eq!(ARGS[3].kind, ArgumentKind::Text);
    }

    #[test]
    fn test_protocol_tag_is_checked() {
        assert!(Request::with_protocol_tag("a", "", "A", "xsi", &[]).is_ok());
        assert_eq!(
            Request::with_protocol_tag("a", "", "A", "soap", &[]),
            Err(RegistryError::UnknownProtocol("soap".into()))
        );
    }

    #[test]
    fn test_position_collision() {
        static CLASH: &[Argument] = &[Argument::positional("a", 1), Argument::positional("b", 1)];
        let request = Request::new("x", "", "X", Protocol::Ocip, CLASH);
        assert_eq!(request.position_collision(), Some(1));
        let request = Request::new("y", "", "Y", Protocol::Ocip, ARGS);
        assert_eq!(request.position_collision(), None);
    }
}
