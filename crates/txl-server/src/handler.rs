use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use chrono::Utc;
use serde_json::json;
use txl_ledger::{LedgerReader, LedgerWriter};

use crate::api::{
    endpoints, HealthResponse, IngestResponse, ResetResponse, TransactionsResponse, UNKNOWN_USER,
};
use crate::error::ServerResult;
use crate::state::AppState;

/// Receive one transaction payload.
///
/// The body is taken as bytes and decoded lossily so that no payload is
/// rejected before extraction.
pub async fn receive_transaction(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ServerResult<Json<IngestResponse>> {
    let raw = String::from_utf8_lossy(&body).into_owned();
    tracing::info!(bytes = raw.len(), "received transaction payload");

    let extraction = state.extractor.extract(&raw);
    let summary = extraction.summary;
    let (record, stats) = state.ledger.append_with_stats(raw, extraction.into_fields())?;
    let count = stats.total_received;

    let user = record
        .field(&state.display_field)
        .and_then(|f| f.value())
        .unwrap_or(UNKNOWN_USER)
        .to_string();

    tracing::info!(
        sequence = record.sequence(),
        mode = %record.mode(),
        user = %user,
        total = count,
        "transaction processed"
    );

    Ok(Json(IngestResponse {
        status: "success".into(),
        message: "Transaction received successfully".into(),
        count,
        sequence: record.sequence(),
        user,
        received_at: record.received_at(),
        mode: record.mode(),
        summary,
        fields: record.fields().to_vec(),
    }))
}

/// Statistics and the retained history, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> ServerResult<Json<TransactionsResponse>> {
    let snapshot = state.ledger.snapshot()?;
    Ok(Json(TransactionsResponse {
        total_count: snapshot.stats.total_received,
        stats: snapshot.stats,
        capacity: snapshot.capacity,
        last_sequence: snapshot.last_sequence,
        last_transactions: snapshot.history,
        last_updated: snapshot.taken_at,
        status: "active".into(),
        processing_mode: "union_extract".into(),
    }))
}

pub async fn reset_ledger(State(state): State<Arc<AppState>>) -> ServerResult<Json<ResetResponse>> {
    state.ledger.reset()?;
    Ok(Json(ResetResponse {
        status: "success".into(),
        message: "Counters reset successfully".into(),
        timestamp: Utc::now(),
    }))
}

pub async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> ServerResult<Json<HealthResponse>> {
    let stats = state.ledger.stats()?;
    Ok(Json(HealthResponse::healthy(stats.total_received)))
}

pub async fn info_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "name": crate::api::SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "processing_mode": "union_extract",
        "history_capacity": state.ledger.capacity(),
        "expected_fields": state.extractor.expected_fields(),
        "endpoints": {
            "webhook_post": endpoints::TRANSACTIONS,
            "webhook_get": endpoints::TRANSACTIONS,
            "reset": endpoints::RESET,
            "health": endpoints::HEALTH,
        },
    }))
}
