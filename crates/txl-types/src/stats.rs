use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::ExtractionMode;
use crate::record::TransactionRecord;

/// Running counters kept by the ledger.
///
/// Counters only grow until an explicit reset zeroes them.
/// `structural_count + fallback_count == total_received` always holds. Failed
/// fields never pick the bucket; they only add to `failed_field_count`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_received: u64,
    pub structural_count: u64,
    pub fallback_count: u64,
    /// Sum of failed fields over every record counted, evicted or not.
    pub failed_field_count: u64,
}

impl LedgerStats {
    /// Account for one appended record.
    pub fn record(&mut self, record: &TransactionRecord) {
        self.total_received += 1;
        let fell_back = record
            .fields()
            .iter()
            .any(|f| f.mode() == ExtractionMode::Fallback);
        if fell_back {
            self.fallback_count += 1;
        } else {
            self.structural_count += 1;
        }
        self.failed_field_count += record.failed_fields() as u64;
    }
}

/// A consistent, owned view of the ledger at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub stats: LedgerStats,
    /// Retained records, newest first.
    pub history: Vec<TransactionRecord>,
    pub capacity: usize,
    /// Highest sequence number ever assigned, 0 before the first append.
    /// Survives resets.
    pub last_sequence: u64,
    pub taken_at: DateTime<Utc>,
}

impl LedgerSnapshot {
    /// The most recently appended record still retained.
    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.history.first()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
