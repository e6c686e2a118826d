use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wrapped::WrappedValue;

/// How a field's value was recovered.
///
/// Variants are ordered from best to worst so the aggregate mode of a group
/// of fields is simply their maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Determined from a well-formed payload, including explicit `null`.
    Structural,
    /// Recovered from an atypical shape or by pattern search over raw text.
    Fallback,
    /// Named but not recoverable. The value is always absent.
    Failed,
}

impl ExtractionMode {
    /// Worst mode across an iterator of modes; `Structural` when empty.
    pub fn worst(modes: impl IntoIterator<Item = Self>) -> Self {
        modes.into_iter().max().unwrap_or(Self::Structural)
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Fallback => write!(f, "fallback"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A single extracted field.
///
/// Built only through the constructors, which keep `Failed` fields valueless.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    name: String,
    value: Option<String>,
    mode: ExtractionMode,
}

impl ExtractedField {
    pub fn structural(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            mode: ExtractionMode::Structural,
        }
    }

    pub fn fallback(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            mode: ExtractionMode::Fallback,
        }
    }

    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            mode: ExtractionMode::Failed,
        }
    }

    /// Unwrap a received value: `null` and wrapped primitives are structural,
    /// raw shapes are kept verbatim as fallback.
    pub fn from_wrapped(name: impl Into<String>, wrapped: WrappedValue) -> Self {
        match wrapped {
            WrappedValue::Null => Self::structural(name, None),
            WrappedValue::Wrapped { value, .. } => Self::structural(name, Some(value)),
            WrappedValue::Raw { text } => Self::fallback(name, Some(text)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    pub fn is_failed(&self) -> bool {
        self.mode == ExtractionMode::Failed
    }
}

impl fmt::Display for ExtractedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={v} ({})", self.name, self.mode),
            None => write!(f, "{}=<none> ({})", self.name, self.mode),
        }
    }
}
