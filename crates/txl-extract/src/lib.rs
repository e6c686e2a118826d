//! Union field extractor for TXL.
//!
//! Turns a payload of union-wrapped fields such as
//! `{"creat_time":{"string":"2025-07-10T07:00:00"},"data":null}` into plain
//! [`ExtractedField`]s. Extraction is a total function: a well-formed payload
//! is decoded structurally, anything else is recovered field by field with
//! text patterns, and whatever cannot be recovered is reported as
//! [`ExtractionMode::Failed`] rather than as an error.
//!
//! [`ExtractedField`]: txl_types::ExtractedField
//! [`ExtractionMode::Failed`]: txl_types::ExtractionMode::Failed

pub mod error;
pub mod extractor;
pub mod fallback;
pub mod structural;

pub use error::MalformedPayload;
pub use extractor::{Extraction, ExtractionPass, ExtractionSummary, UnionExtractor};

/// Extract with a default [`UnionExtractor`] (no expected field names).
pub fn extract(payload: &str) -> Extraction {
    UnionExtractor::new().extract(payload)
}
