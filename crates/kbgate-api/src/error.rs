//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kbgate_core::KbGateError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fallback message when a failure carries no text
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable message
    #[schema(example = "Missing 'query' in body")]
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self {
                error: INTERNAL_ERROR_MESSAGE.to_string(),
            }
        } else {
            Self { error: message }
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new(msg)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(msg)),
        };

        (status, Json(error)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<KbGateError> for AppError {
    fn from(err: KbGateError) -> Self {
        match err {
            KbGateError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::from(KbGateError::Validation("bad top".to_string()));
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "bad top"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_internal_verbatim() {
        let err = AppError::from(KbGateError::Upstream("ThrottlingException".to_string()));
        assert!(matches!(err, AppError::Internal(ref m) if m == "ThrottlingException"));
    }

    #[test]
    fn test_empty_message_falls_back() {
        assert_eq!(ApiError::new("").error, INTERNAL_ERROR_MESSAGE);
        assert_eq!(ApiError::new("  ").error, INTERNAL_ERROR_MESSAGE);
        assert_eq!(ApiError::new("boom").error, "boom");
    }
}
