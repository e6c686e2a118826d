//! Shared data model for TXL.
//!
//! Every other TXL crate depends on `txl-types`. The extractor produces
//! [`ExtractedField`]s, the ledger wraps them into [`TransactionRecord`]s and
//! reports [`LedgerStats`] through a [`LedgerSnapshot`].
//!
//! # Key Types
//!
//! - [`WrappedValue`] — one field exactly as received (`null`, `{"tag": v}`, or anything else)
//! - [`ExtractionMode`] — how a field value was recovered, ordered worst-last
//! - [`ExtractedField`] — a field name with its plain scalar value and mode
//! - [`TransactionRecord`] — an immutable, sequenced record held by the ledger
//! - [`LedgerStats`] / [`LedgerSnapshot`] — counters and a consistent view of history

pub mod field;
pub mod record;
pub mod stats;
pub mod wrapped;

pub use field::{ExtractedField, ExtractionMode};
pub use record::TransactionRecord;
pub use stats::{LedgerSnapshot, LedgerStats};
pub use wrapped::WrappedValue;
