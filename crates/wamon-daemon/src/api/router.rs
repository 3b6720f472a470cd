//! API router configuration

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the exporter router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/readyz", get(handlers::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
