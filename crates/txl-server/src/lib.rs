//! HTTP intake for TXL.
//!
//! Receives union-wrapped transaction payloads from the upstream connector,
//! runs them through the extractor, records them in the bounded ledger, and
//! exposes the ledger's statistics and recent history.

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use api::{HealthResponse, IngestResponse, ResetResponse, TransactionsResponse};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::TxlServer;
pub use state::AppState;
