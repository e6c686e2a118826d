use txl_types::{ExtractedField, LedgerSnapshot, LedgerStats, TransactionRecord};

use crate::error::LedgerError;

/// Write boundary for ledger mutations.
pub trait LedgerWriter: Send + Sync {
    /// Record one received payload and its extracted fields.
    fn append(
        &self,
        raw_payload: String,
        fields: Vec<ExtractedField>,
    ) -> Result<TransactionRecord, LedgerError> {
        self.append_with_stats(raw_payload, fields)
            .map(|(record, _)| record)
    }

    /// Like [`append`](Self::append), also returning the counters as they
    /// stood right after this record was counted.
    fn append_with_stats(
        &self,
        raw_payload: String,
        fields: Vec<ExtractedField>,
    ) -> Result<(TransactionRecord, LedgerStats), LedgerError>;

    /// Clear history and zero the counters. Sequence numbering continues.
    fn reset(&self) -> Result<(), LedgerError>;
}

/// Read boundary for ledger inspection.
pub trait LedgerReader: Send + Sync {
    /// Counters and history (newest first) as of one instant.
    fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError>;

    fn stats(&self) -> Result<LedgerStats, LedgerError>;

    /// Number of records currently retained.
    fn len(&self) -> Result<usize, LedgerError>;

    fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }
}
