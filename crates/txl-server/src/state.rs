use txl_extract::UnionExtractor;
use txl_ledger::BoundedLedger;

use crate::config::ServerConfig;

/// Shared by every request handler.
pub struct AppState {
    pub extractor: UnionExtractor,
    pub ledger: BoundedLedger,
    pub display_field: String,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            extractor: UnionExtractor::with_expected_fields(config.expected_fields.iter().cloned()),
            ledger: BoundedLedger::with_capacity(config.history_capacity),
            display_field: config.display_field.clone(),
        }
    }
}
