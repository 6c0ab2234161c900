//! KBGate API - HTTP front door
//!
//! Exposes liveness probes and `POST /rag/query`, which forwards a query plus
//! the instruction template to the knowledge base generator and relays the
//! generated text.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the gateway
#[derive(OpenApi)]
#[openapi(
    info(
        title = "KBGate API",
        description = "Knowledge base retrieve-and-generate gateway"
    ),
    paths(
        handlers::health::root,
        handlers::health::health_check,
        handlers::query::query_handler,
    ),
    components(schemas(
        handlers::health::HealthResponse,
        handlers::query::QueryRequest,
        error::ApiError,
    )),
    tags(
        (name = "health", description = "Liveness probes"),
        (name = "query", description = "Knowledge base queries")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let cors = middleware::cors_layer(&server.cors_origins);
    let body_limit = DefaultBodyLimit::max(server.max_body_size);

    Router::new()
        .merge(routes::health_routes())
        .merge(routes::api_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(body_limit)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
