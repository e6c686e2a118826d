use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all intake endpoints.
pub fn build_router(state: Arc<AppState>, max_payload_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(handler::info_handler))
        .route(
            endpoints::TRANSACTIONS,
            post(handler::receive_transaction).get(handler::list_transactions),
        )
        .route(endpoints::RESET, post(handler::reset_ledger))
        .route(endpoints::HEALTH, get(handler::health_handler))
        .layer(DefaultBodyLimit::max(max_payload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
