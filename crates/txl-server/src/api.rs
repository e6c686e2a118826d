use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use txl_extract::ExtractionSummary;
use txl_types::{ExtractedField, ExtractionMode, LedgerStats, TransactionRecord};

/// HTTP endpoint paths.
pub mod endpoints {
    pub const ROOT: &str = "/";
    pub const TRANSACTIONS: &str = "/webhook/user-transactions";
    pub const RESET: &str = "/webhook/reset";
    pub const HEALTH: &str = "/health";
}

pub const SERVICE_NAME: &str = "txl-webhook";

/// Value echoed as `user` when the display field is missing or absent.
pub const UNKNOWN_USER: &str = "UNKNOWN";

/// Reply to a received transaction. Partial extraction is still a success;
/// callers inspect `mode` and the per-field modes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub message: String,
    pub count: u64,
    pub sequence: u64,
    pub user: String,
    pub received_at: DateTime<Utc>,
    pub mode: ExtractionMode,
    pub summary: ExtractionSummary,
    pub fields: Vec<ExtractedField>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub total_count: u64,
    pub stats: LedgerStats,
    pub capacity: usize,
    pub last_sequence: u64,
    /// Newest first.
    pub last_transactions: Vec<TransactionRecord>,
    pub last_updated: DateTime<Utc>,
    pub status: String,
    pub processing_mode: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub total_transactions: u64,
}

impl HealthResponse {
    pub fn healthy(total_transactions: u64) -> Self {
        Self {
            status: "healthy".into(),
            service: SERVICE_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            timestamp: Utc::now(),
            total_transactions,
        }
    }
}
