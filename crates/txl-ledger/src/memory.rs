use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::Utc;
use txl_types::{ExtractedField, LedgerSnapshot, LedgerStats, TransactionRecord};

use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};

/// History length used by [`BoundedLedger::new`].
pub const DEFAULT_CAPACITY: usize = 10;

/// In-memory ledger keeping the most recent records and running counters.
///
/// History, counters and the sequence counter live behind one lock, so an
/// append (eviction, counter update, push) is observed either completely or
/// not at all.
pub struct BoundedLedger {
    capacity: usize,
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    /// Oldest at the front, newest at the back.
    history: VecDeque<TransactionRecord>,
    stats: LedgerStats,
    next_sequence: u64,
}

impl BoundedLedger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "ledger capacity must be at least 1");
        Self {
            capacity,
            inner: RwLock::new(LedgerState {
                history: VecDeque::with_capacity(capacity),
                stats: LedgerStats::default(),
                next_sequence: 1,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BoundedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for BoundedLedger {
    fn append_with_stats(
        &self,
        raw_payload: String,
        fields: Vec<ExtractedField>,
    ) -> Result<(TransactionRecord, LedgerStats), LedgerError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))?;

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let record = TransactionRecord::new(sequence, Utc::now(), fields, raw_payload);
        state.stats.record(&record);

        if state.history.len() == self.capacity {
            if let Some(evicted) = state.history.pop_front() {
                tracing::trace!(sequence = evicted.sequence(), "evicted oldest record");
            }
        }
        state.history.push_back(record.clone());

        tracing::debug!(
            sequence,
            mode = %record.mode(),
            failed_fields = record.failed_fields(),
            "transaction appended"
        );
        Ok((record, state.stats))
    }

    fn reset(&self) -> Result<(), LedgerError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))?;

        let dropped = state.history.len();
        state.history.clear();
        state.stats = LedgerStats::default();

        tracing::info!(
            dropped,
            next_sequence = state.next_sequence,
            "ledger reset"
        );
        Ok(())
    }
}

impl LedgerReader for BoundedLedger {
    fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;

        Ok(LedgerSnapshot {
            stats: state.stats,
            history: state.history.iter().rev().cloned().collect(),
            capacity: self.capacity,
            last_sequence: state.next_sequence - 1,
            taken_at: Utc::now(),
        })
    }

    fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;

        Ok(state.stats)
    }

    fn len(&self) -> Result<usize, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;

        Ok(state.history.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use txl_types::ExtractionMode;

    fn structural() -> Vec<ExtractedField> {
        vec![ExtractedField::structural("a", Some("1".into()))]
    }

    fn fallback() -> Vec<ExtractedField> {
        vec![ExtractedField::fallback("a", Some("1".into()))]
    }

    #[test]
    fn sequences_start_at_one_and_increase() {
        let ledger = BoundedLedger::new();
        let first = ledger.append("{}".into(), structural()).unwrap();
        let second = ledger.append("{}".into(), structural()).unwrap();

        assert_eq!(first.sequence(), 1);
        assert_eq!(second.sequence(), 2);
        assert!(second.received_at() >= first.received_at());
    }

    #[test]
    fn counts_by_record_mode() {
        let ledger = BoundedLedger::new();
        ledger.append("1".into(), structural()).unwrap();
        ledger.append("2".into(), fallback()).unwrap();
        ledger.append("3".into(), structural()).unwrap();

        let snap = ledger.snapshot().unwrap();
        assert_eq!(
            snap.stats,
            LedgerStats {
                total_received: 3,
                structural_count: 2,
                fallback_count: 1,
                failed_field_count: 0,
            }
        );
        assert_eq!(snap.history.len(), 3);
    }

    #[test]
    fn failed_fields_counted_individually() {
        let ledger = BoundedLedger::new();
        let mut fields: Vec<_> = (0..3)
            .map(|i| ExtractedField::structural(format!("s{i}"), None))
            .collect();
        fields.push(ExtractedField::failed("x"));
        fields.push(ExtractedField::failed("y"));

        let record = ledger.append("{".into(), fields).unwrap();
        assert_eq!(record.mode(), ExtractionMode::Failed);

        let stats = ledger.stats().unwrap();
        assert_eq!(stats.total_received, 1);
        assert_eq!(stats.structural_count, 1);
        assert_eq!(stats.fallback_count, 0);
        assert_eq!(stats.failed_field_count, 2);

        let fields = vec![
            ExtractedField::fallback("a", Some("1".into())),
            ExtractedField::failed("x"),
        ];
        ledger.append("{".into(), fields).unwrap();
        let stats = ledger.stats().unwrap();
        assert_eq!(stats.structural_count, 1);
        assert_eq!(stats.fallback_count, 1);
        assert_eq!(stats.failed_field_count, 3);
    }

    #[test]
    fn append_returns_counters_from_the_same_write() {
        let ledger = BoundedLedger::new();
        ledger.append("1".into(), structural()).unwrap();

        let (record, stats) = ledger.append_with_stats("2".into(), fallback()).unwrap();
        assert_eq!(record.sequence(), 2);
        assert_eq!(stats.total_received, 2);
        assert_eq!(stats.fallback_count, 1);

        ledger.reset().unwrap();
        let (record, stats) = ledger.append_with_stats("3".into(), structural()).unwrap();
        assert_eq!(record.sequence(), 3);
        assert_eq!(stats.total_received, 1);
    }

    #[test]
    fn concurrent_appends_see_their_own_counts() {
        let ledger = Arc::new(BoundedLedger::new());

        let mut totals: Vec<u64> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let ledger = Arc::clone(&ledger);
                    scope.spawn(move || {
                        (0..25)
                            .map(|_| {
                                let (record, stats) =
                                    ledger.append_with_stats(String::new(), structural()).unwrap();
                                assert_eq!(stats.total_received, record.sequence());
                                stats.total_received
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        totals.sort_unstable();
        assert_eq!(totals, (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let ledger = BoundedLedger::new();
        for i in 0..25 {
            ledger.append(format!("payload-{i}"), structural()).unwrap();
        }

        let snap = ledger.snapshot().unwrap();
        assert_eq!(snap.history.len(), DEFAULT_CAPACITY);
        let seqs: Vec<u64> = snap.history.iter().map(TransactionRecord::sequence).collect();
        assert_eq!(seqs, (16..=25).rev().collect::<Vec<_>>());
        assert_eq!(snap.latest().unwrap().raw_payload(), "payload-24");
        assert_eq!(snap.stats.total_received, 25);
        assert_eq!(snap.last_sequence, 25);
    }

    #[test]
    fn evicted_records_still_count() {
        let ledger = BoundedLedger::with_capacity(2);
        for _ in 0..5 {
            ledger
                .append("{".into(), vec![ExtractedField::failed("x")])
                .unwrap();
        }

        let snap = ledger.snapshot().unwrap();
        assert_eq!(snap.history.len(), 2);
        assert_eq!(snap.stats.failed_field_count, 5);
        assert_eq!(snap.stats.structural_count, 5);
    }

    #[test]
    fn reset_clears_state_but_not_sequence() {
        let ledger = BoundedLedger::new();
        for _ in 0..4 {
            ledger.append("{}".into(), structural()).unwrap();
        }
        ledger.reset().unwrap();

        let snap = ledger.snapshot().unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.stats, LedgerStats::default());
        assert_eq!(snap.last_sequence, 4);
        assert!(ledger.is_empty().unwrap());

        let next = ledger.append("{}".into(), structural()).unwrap();
        assert_eq!(next.sequence(), 5);
        assert_eq!(ledger.stats().unwrap().total_received, 1);
    }

    #[test]
    fn empty_ledger_snapshot() {
        let ledger = BoundedLedger::default();
        let snap = ledger.snapshot().unwrap();
        assert_eq!(snap.last_sequence, 0);
        assert_eq!(snap.capacity, DEFAULT_CAPACITY);
        assert!(snap.latest().is_none());
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn zero_capacity_is_rejected() {
        let _ = BoundedLedger::with_capacity(0);
    }

    #[test]
    fn records_keep_extracted_fields() {
        let ledger = BoundedLedger::new();
        let payload = r#"{"usrname":{"string":"jdoe"},"data":null}"#;
        let extraction = txl_extract::extract(payload);

        let record = ledger
            .append(payload.to_string(), extraction.into_fields())
            .unwrap();

        assert_eq!(record.raw_payload(), payload);
        assert_eq!(record.field("usrname").and_then(|f| f.value()), Some("jdoe"));
        assert_eq!(record.mode(), ExtractionMode::Structural);
    }

    #[test]
    fn concurrent_appends_are_atomic() {
        let ledger = Arc::new(BoundedLedger::new());
        let writers = 8;
        let per_writer = 50;

        thread::scope(|scope| {
            for w in 0..writers {
                let ledger = Arc::clone(&ledger);
                scope.spawn(move || {
                    for i in 0..per_writer {
                        let fields = if (w + i) % 3 == 0 {
                            vec![
                                ExtractedField::fallback("a", None),
                                ExtractedField::failed("x"),
                            ]
                        } else {
                            vec![ExtractedField::structural("a", None)]
                        };
                        ledger.append(String::new(), fields).unwrap();
                    }
                });
            }
            let reader = Arc::clone(&ledger);
            scope.spawn(move || {
                for _ in 0..200 {
                    let snap = reader.snapshot().unwrap();
                    let s = snap.stats;
                    assert_eq!(s.structural_count + s.fallback_count, s.total_received);
                    assert_eq!(s.failed_field_count, s.fallback_count);
                    assert_eq!(snap.last_sequence, s.total_received);
                    assert_eq!(snap.history.len() as u64, s.total_received.min(10));
                    if let Some(latest) = snap.latest() {
                        assert_eq!(latest.sequence(), snap.last_sequence);
                    }
                }
            });
        });

        let snap = ledger.snapshot().unwrap();
        let total = (writers * per_writer) as u64;
        assert_eq!(snap.stats.total_received, total);
        assert_eq!(snap.last_sequence, total);
        let seqs: Vec<u64> = snap.history.iter().map(TransactionRecord::sequence).collect();
        assert!(seqs.windows(2).all(|w| w[0] == w[1] + 1));
    }
}
