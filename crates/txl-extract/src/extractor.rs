use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use txl_types::{ExtractedField, ExtractionMode, WrappedValue};

use crate::{fallback, structural};

/// Which pass produced an extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPass {
    /// The payload decoded as a mapping.
    Structural,
    /// The payload did not decode; fields were recovered from the text.
    Fallback,
}

/// Per-mode field counts for one extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub pass: ExtractionPass,
    pub structural: usize,
    pub fallback: usize,
    pub failed: usize,
}

impl ExtractionSummary {
    fn tally(pass: ExtractionPass, fields: &[ExtractedField]) -> Self {
        let mut summary = Self {
            pass,
            structural: 0,
            fallback: 0,
            failed: 0,
        };
        for field in fields {
            match field.mode() {
                ExtractionMode::Structural => summary.structural += 1,
                ExtractionMode::Fallback => summary.fallback += 1,
                ExtractionMode::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// Worst mode across the extracted fields.
    pub fn mode(&self) -> ExtractionMode {
        if self.failed > 0 {
            ExtractionMode::Failed
        } else if self.fallback > 0 {
            ExtractionMode::Fallback
        } else {
            ExtractionMode::Structural
        }
    }

    pub fn total(&self) -> usize {
        self.structural + self.fallback + self.failed
    }
}

/// Result of extracting one payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub fields: Vec<ExtractedField>,
    pub summary: ExtractionSummary,
}

impl Extraction {
    pub fn field(&self, name: &str) -> Option<&ExtractedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn into_fields(self) -> Vec<ExtractedField> {
        self.fields
    }
}

/// Two-tier extractor for union-wrapped payloads.
///
/// Stateless apart from its configuration, so one instance can be shared by
/// any number of concurrent callers.
#[derive(Clone, Debug, Default)]
pub struct UnionExtractor {
    expected: Vec<String>,
}

impl UnionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names that must appear in every extraction. A name the payload does
    /// not provide is reported as a `Failed` field after the payload's own
    /// fields, in the order given here.
    pub fn with_expected_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expected: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !expected.contains(&name) {
                expected.push(name);
            }
        }
        Self { expected }
    }

    pub fn expected_fields(&self) -> &[String] {
        &self.expected
    }

    /// Extract fields from a raw payload. Never fails.
    pub fn extract(&self, payload: &str) -> Extraction {
        match structural::decode(payload) {
            Ok(entries) => {
                tracing::debug!(fields = entries.len(), "payload decoded structurally");
                self.finish(ExtractionPass::Structural, unwrap_entries(entries))
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    payload_len = payload.len(),
                    "structural decode failed, falling back to pattern recovery"
                );
                let mut fields = FieldSet::default();
                for field in fallback::recover(payload) {
                    fields.merge(field);
                }
                for name in &self.expected {
                    if !fields.contains(name) {
                        fields.merge(fallback::recover_field(payload, name));
                    }
                }
                self.finish(ExtractionPass::Fallback, fields)
            }
        }
    }

    /// Unwrap an already-decoded mapping of field name to wrapped value.
    pub fn extract_wrapped<I, S>(&self, entries: I) -> Extraction
    where
        I: IntoIterator<Item = (S, WrappedValue)>,
        S: Into<String>,
    {
        let entries = entries.into_iter().map(|(name, value)| (name.into(), value));
        self.finish(ExtractionPass::Structural, unwrap_entries(entries))
    }

    fn finish(&self, pass: ExtractionPass, mut fields: FieldSet) -> Extraction {
        for name in &self.expected {
            if !fields.contains(name) {
                tracing::debug!(field = %name, "expected field not present in payload");
                fields.merge(ExtractedField::failed(name.as_str()));
            }
        }
        let fields = fields.into_vec();
        let summary = ExtractionSummary::tally(pass, &fields);
        Extraction { fields, summary }
    }
}

fn unwrap_entries(entries: impl IntoIterator<Item = (String, WrappedValue)>) -> FieldSet {
    let mut fields = FieldSet::default();
    for (name, value) in entries {
        fields.merge(ExtractedField::from_wrapped(name, value));
    }
    fields
}

/// Ordered fields keyed by name: first position, last value.
#[derive(Default)]
struct FieldSet {
    fields: Vec<ExtractedField>,
    index: HashMap<String, usize>,
}

impl FieldSet {
    fn merge(&mut self, field: ExtractedField) {
        match self.index.get(field.name()) {
            Some(&i) => self.fields[i] = field,
            None => {
                self.index.insert(field.name().to_string(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn into_vec(self) -> Vec<ExtractedField> {
        self.fields
    }
}
