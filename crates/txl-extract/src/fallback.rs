//! Pattern-based recovery for payloads that do not decode.
//!
//! Works directly on the text, one field name at a time, so a truncated or
//! otherwise broken payload still yields every field whose own fragment is
//! intact.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use txl_types::ExtractedField;

/// A quoted key followed by the start of a wrapped value or by `null`.
static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\\]+)"\s*:\s*(?:\{|null\b)"#).unwrap());

/// Field names in order of first appearance, without duplicates.
///
/// Only keys of the outermost mapping count: a key nested inside a field's
/// value is not a field of its own.
pub fn field_names(payload: &str) -> Vec<String> {
    let keys = shallow_string_starts(payload);
    let mut seen = HashSet::new();
    FIELD_NAME
        .captures_iter(payload)
        .filter(|caps| caps.get(0).is_some_and(|m| keys.contains(&m.start())))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Byte offsets of the opening quote of every string at nesting depth one or
/// less. Brackets inside strings are ignored; unbalanced closers clamp at 0.
fn shallow_string_starts(payload: &str) -> HashSet<usize> {
    let mut starts = HashSet::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in payload.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => {
                in_string = true;
                if depth <= 1 {
                    starts.insert(i);
                }
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    starts
}

/// Recover every discoverable field from the text.
pub fn recover(payload: &str) -> Vec<ExtractedField> {
    field_names(payload)
        .into_iter()
        .map(|name| recover_field(payload, &name))
        .collect()
}

/// Recover one named field.
///
/// Tries, in order, a wrapped value `"name":{"tag":"value"}`, an explicit
/// `"name":null`, and a bare string `"name":"value"`. Within each shape the
/// last occurrence wins. A name matching none of them is `Failed`.
pub fn recover_field(payload: &str, name: &str) -> ExtractedField {
    let Some(patterns) = FieldPatterns::new(name) else {
        return ExtractedField::failed(name);
    };

    if let Some(value) = last_capture(&patterns.wrapped, payload) {
        return ExtractedField::fallback(name, Some(value));
    }
    if patterns.null.is_match(payload) {
        return ExtractedField::fallback(name, None);
    }
    if let Some(value) = last_capture(&patterns.direct, payload) {
        return ExtractedField::fallback(name, Some(value));
    }

    ExtractedField::failed(name)
}

struct FieldPatterns {
    wrapped: Regex,
    null: Regex,
    direct: Regex,
}

impl FieldPatterns {
    fn new(name: &str) -> Option<Self> {
        let key = format!(r#""{}"\s*:\s*"#, regex::escape(name));
        Some(Self {
            wrapped: Regex::new(&format!(r#"{key}\{{\s*"\w+"\s*:\s*"([^"]*)"\s*\}}"#)).ok()?,
            null: Regex::new(&format!(r"{key}null\b")).ok()?,
            direct: Regex::new(&format!(r#"{key}"([^"]*)""#)).ok()?,
        })
    }
}

fn last_capture(pattern: &Regex, payload: &str) -> Option<String> {
    pattern
        .captures_iter(payload)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|m| m.as_str().to_string())
}
