//! RAG query handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use kbgate_core::{AnswerEnvelope, InstructionTemplate, RagQuery};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

/// Query request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Free-text description of the service
    #[schema(example = "chest x-ray")]
    pub query: String,

    /// Number of candidates to return.
    /// An integer from 1 to 20, or a string holding one.
    /// Whole-valued numbers such as `5.0` count as integers.
    /// `null` or absent means 5.
    #[schema(example = 5, default = 5, minimum = 1, maximum = 20)]
    pub top: Option<u8>,
}

/// Handle RAG query requests
///
/// The body is parsed as JSON whatever the `Content-Type` says; an
/// unreadable body is treated as one without a query. On success the
/// generated text is returned untouched, even when it is empty.
#[utoipa::path(
    post,
    path = "/rag/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Generated answer JSON, relayed as-is"),
        (status = 400, description = "Invalid request", body = crate::error::ApiError),
        (status = 500, description = "Generation failed", body = crate::error::ApiError)
    )
)]
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let request = RagQuery::from_json(&payload)?;

    let instruction = InstructionTemplate::new(request.top_k).render_today();

    tracing::debug!(
        top_k = request.top_k,
        query_chars = request.query.chars().count(),
        "Forwarding query to knowledge base"
    );

    let answer = state
        .generator
        .generate(&request.query, &instruction)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "RAG error");
            e
        })?;

    if state.validates_answers() {
        if let Err(e) = AnswerEnvelope::parse(&answer) {
            tracing::error!(error = %e, "Generated answer failed validation");
            return Err(e.into());
        }
    }

    Ok(([(header::CONTENT_TYPE, "application/json")], answer).into_response())
}
