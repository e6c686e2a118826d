use serde_json::Value;
use txl_types::WrappedValue;

use crate::error::MalformedPayload;

/// Decode a payload as a flat mapping of field name to wrapped value.
///
/// Entries come back in the order their keys first appear. A repeated key
/// keeps its first position and takes the last value.
pub fn decode(payload: &str) -> Result<Vec<(String, WrappedValue)>, MalformedPayload> {
    let value: Value = serde_json::from_str(payload)?;
    match value {
        Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(name, v)| {
                let wrapped = WrappedValue::from_json(&v);
                (name, wrapped)
            })
            .collect()),
        other => Err(MalformedPayload::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
