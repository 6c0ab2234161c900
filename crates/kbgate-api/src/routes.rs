//! API route definitions

use crate::handlers::{health, query};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Liveness probes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
}

/// Business routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/rag/query", post(query::query_handler))
}
