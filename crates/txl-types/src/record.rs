use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::{ExtractedField, ExtractionMode};

/// A received transaction as retained by the ledger.
///
/// Records are created once by the ledger, which assigns the sequence number
/// and receipt time, and are never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    sequence: u64,
    received_at: DateTime<Utc>,
    fields: Vec<ExtractedField>,
    raw_payload: String,
}

impl TransactionRecord {
    pub fn new(
        sequence: u64,
        received_at: DateTime<Utc>,
        fields: Vec<ExtractedField>,
        raw_payload: String,
    ) -> Self {
        Self {
            sequence,
            received_at,
            fields,
            raw_payload,
        }
    }

    /// Sequence number (1-based, monotonic, never reused).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Fields in the order they first appeared in the payload.
    pub fn fields(&self) -> &[ExtractedField] {
        &self.fields
    }

    /// The payload text exactly as received.
    pub fn raw_payload(&self) -> &str {
        &self.raw_payload
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&ExtractedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Worst mode across all fields. A record without fields is structural.
    pub fn mode(&self) -> ExtractionMode {
        ExtractionMode::worst(self.fields.iter().map(ExtractedField::mode))
    }

    /// Number of fields marked [`ExtractionMode::Failed`].
    pub fn failed_fields(&self) -> usize {
        self.fields.iter().filter(|f| f.is_failed()).count()
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tx#{} [{}] {} fields, {}",
            self.sequence,
            self.received_at.to_rfc3339(),
            self.fields.len(),
            self.mode()
        )
    }
}
