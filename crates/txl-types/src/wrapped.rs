use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field value exactly as it arrived on the wire.
///
/// The upstream encoding wraps every primitive in a single-entry object
/// naming its type (`{"string": "1"}`) and encodes absence as `null`.
/// Anything else is kept as text in [`WrappedValue::Raw`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WrappedValue {
    /// Explicit absence.
    Null,
    /// A primitive wrapped in its type tag. The tag is carried, not interpreted.
    Wrapped { type_tag: String, value: String },
    /// A shape other than the two above, rendered as text.
    Raw { text: String },
}

impl WrappedValue {
    /// Wrap a value with a type tag.
    pub fn wrapped(type_tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Wrapped {
            type_tag: type_tag.into(),
            value: value.into(),
        }
    }

    /// Keep a value as raw text.
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw { text: text.into() }
    }

    /// Classify a decoded JSON value.
    ///
    /// `null` becomes [`WrappedValue::Null`]; an object with exactly one entry
    /// whose value is a string, number or boolean becomes
    /// [`WrappedValue::Wrapped`]. Every other shape becomes
    /// [`WrappedValue::Raw`]: a bare string keeps its content, everything
    /// else is rendered as compact JSON.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Object(entries) if entries.len() == 1 => entries
                .iter()
                .next()
                .and_then(|(tag, inner)| scalar_text(inner).map(|text| Self::wrapped(tag, text)))
                .unwrap_or_else(|| Self::raw(value.to_string())),
            Value::String(text) => Self::raw(text.clone()),
            other => Self::raw(other.to_string()),
        }
    }

    /// Returns `true` for [`WrappedValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The type tag, if this is a wrapped primitive.
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Self::Wrapped { type_tag, .. } => Some(type_tag),
            _ => None,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl fmt::Display for WrappedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Wrapped { type_tag, value } => write!(f, "{type_tag}:{value}"),
            Self::Raw { text } => write!(f, "raw:{text}"),
        }
    }
}
