//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health, list_available, metrics_text, not_found, place_bet, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Betting endpoints
        .route("/available", get(list_available).fallback(not_found))
        .route("/bets", post(place_bet).fallback(not_found))
        // Operational endpoints
        .route("/health", get(health).fallback(not_found))
        .route("/metrics", get(metrics_text).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
