//! Bounded transaction ledger for TXL.
//!
//! This crate provides:
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `BoundedLedger`, a fixed-capacity rolling history with process-lifetime
//!   counters, safe to share between concurrent request handlers
//!
//! Sequence numbers are assigned here and are never reused, not even after
//! a reset, so a sequence number identifies one received payload for the
//! life of the process.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::LedgerError;
pub use memory::{BoundedLedger, DEFAULT_CAPACITY};
pub use traits::{LedgerReader, LedgerWriter};
