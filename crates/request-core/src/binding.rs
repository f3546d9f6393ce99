//! Binding raw form inputs to a client call
//!
//! Each argument, in declared order, goes through the same pipeline:
//! checkbox read (booleans) or presence check (everything else), base64
//! encoding, optional-empty fallback to the declared default, and placement
//! in the positional list or the keyword bag.

use crate::error::{DispatchError, DispatchResult};
use crate::model::{DefaultValue, Position, Request};
use crate::property::{PropertyAccessor, PropertyValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bwks_xml_core::bool_to_str;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A raw submitted form value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Flag(value)
    }
}

/// Submitted form: input name to raw value
pub type FormInputs = BTreeMap<String, FormValue>;

/// Build [`FormInputs`] from name/value pairs
pub fn form_inputs<I, K, V>(pairs: I) -> FormInputs
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FormValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A transformed argument value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Text(String),
    Bool(bool),
    /// Optional argument left empty with no declared default
    Absent,
}

impl BoundValue {
    /// Wire representation; booleans become `"true"`/`"false"`
    pub fn wire(&self) -> Option<String> {
        match self {
            BoundValue::Text(text) => Some(text.clone()),
            BoundValue::Bool(b) => Some(bool_to_str(*b).to_string()),
            BoundValue::Absent => None,
        }
    }
}

impl From<DefaultValue> for BoundValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Text(text) => BoundValue::Text(text.to_string()),
            DefaultValue::Checked(checked) => BoundValue::Bool(checked),
            DefaultValue::None => BoundValue::Absent,
        }
    }
}

/// Arguments ready to be handed to a client operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundCall {
    pub positional: Vec<BoundValue>,
    pub keyword: BTreeMap<String, BoundValue>,
    /// Whether any argument was bound by name
    pub uses_keywords: bool,
}

impl BoundCall {
    /// Call without arguments
    pub fn empty() -> Self {
        Self::default()
    }

    /// Required text at a positional index
    pub fn text_at(&self, idx: usize) -> DispatchResult<&str> {
        match self.positional.get(idx) {
            Some(BoundValue::Text(text)) => Ok(text),
            Some(other) => Err(DispatchError::invalid_argument(
                format!("#{}", idx),
                format!("expected text, got {:?}", other),
            )),
            None => Err(DispatchError::missing_argument(format!("#{}", idx))),
        }
    }

    /// Positional text, `None` when absent or out of range
    pub fn optional_text_at(&self, idx: usize) -> Option<&str> {
        match self.positional.get(idx) {
            Some(BoundValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Positional boolean, accepting wire text as well
    pub fn flag_at(&self, idx: usize) -> DispatchResult<bool> {
        match self.positional.get(idx) {
            Some(BoundValue::Bool(b)) => Ok(*b),
            Some(BoundValue::Text(text)) => Ok(bwks_xml_core::str_to_bool(text)),
            Some(BoundValue::Absent) | None => Err(DispatchError::missing_argument(format!("#{}", idx))),
        }
    }

    /// Keyword value by name
    pub fn keyword(&self, name: &str) -> Option<&BoundValue> {
        self.keyword.get(name)
    }

    /// Keyword text, `None` when absent
    pub fn keyword_text(&self, name: &str) -> Option<&str> {
        match self.keyword.get(name) {
            Some(BoundValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Required keyword text
    pub fn require_text(&self, name: &str) -> DispatchResult<&str> {
        self.keyword_text(name)
            .ok_or_else(|| DispatchError::missing_argument(name))
    }

    /// Keyword boolean; a missing keyword reads as `false`
    pub fn flag(&self, name: &str) -> bool {
        match self.keyword.get(name) {
            Some(BoundValue::Bool(b)) => *b,
            Some(BoundValue::Text(text)) => bwks_xml_core::str_to_bool(text),
            _ => false,
        }
    }

    /// Whether a keyword was bound at all
    pub fn has_keyword(&self, name: &str) -> bool {
        self.keyword.contains_key(name)
    }
}

/// A checkbox is checked only when submitted as `on` (or a literal `true` flag)
pub fn checkbox_state(value: Option<&FormValue>) -> bool {
    match value {
        Some(FormValue::Text(text)) => text == "on",
        Some(FormValue::Flag(b)) => *b,
        None => false,
    }
}

/// Bind `inputs` to `request`, echoing every submitted value to `accessor`
///
/// Booleans are echoed as [`PropertyValue::Checked`], other values as the
/// raw text before encoding or default substitution.
pub fn bind(
    request: &Request,
    inputs: &FormInputs,
    accessor: &mut dyn PropertyAccessor,
) -> DispatchResult<BoundCall> {
    let mut placed: Vec<(u8, BoundValue)> = Vec::new();
    let mut call = BoundCall::default();

    for arg in request.args {
        let mut value = if arg.is_bool() {
            let checked = checkbox_state(inputs.get(arg.name));
            accessor.set(arg.name, PropertyValue::Checked(checked));
            BoundValue::Bool(checked)
        } else {
            let raw = match inputs.get(arg.name) {
                Some(FormValue::Text(text)) => text.clone(),
                Some(FormValue::Flag(b)) => bool_to_str(*b).to_string(),
                None => return Err(DispatchError::missing_argument(arg.name)),
            };
            accessor.set(arg.name, PropertyValue::Text(raw.clone()));
            BoundValue::Text(raw)
        };

        if arg.encode {
            if let BoundValue::Text(text) = &value {
                value = BoundValue::Text(STANDARD.encode(text.as_bytes()));
            }
        }

        if arg.optional && value == BoundValue::Text(String::new()) {
            value = arg.default.into();
        }

        match arg.position {
            Position::Index(idx) => placed.push((idx, value)),
            Position::Keyword => {
                call.uses_keywords = true;
                call.keyword.insert(arg.name.to_string(), value);
            }
        }
    }

    placed.sort_by_key(|(idx, _)| *idx);
    call.positional = placed.into_iter().map(|(_, value)| value).collect();

    debug!(
        request = request.name,
        positional = call.positional.len(),
        keyword = call.keyword.len(),
        "bound request arguments"
    );
    Ok(call)
}
