//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::features::FeatureError;
use crate::llm::LlmError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session header required")]
    SessionRequired,
    #[error("Session not found")]
    SessionNotFound,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Session busy: {0}")]
    SessionBusy(String),
    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),
    #[error("{message}")]
    InvalidAiResponse { message: String, detail: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::SessionRequired => (
                StatusCode::UNAUTHORIZED,
                "SESSION_REQUIRED",
                "X-Session-Id header is required".to_string(),
            ),
            ApiError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found or expired".to_string(),
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::SessionBusy(detail) => (StatusCode::CONFLICT, "SESSION_BUSY", detail.clone()),
            ApiError::LlmUnavailable(detail) => {
                tracing::warn!(detail, "LLM call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_UNAVAILABLE",
                    "The AI service is currently unavailable".to_string(),
                )
            }
            ApiError::InvalidAiResponse { message, detail } => {
                tracing::warn!(detail, "AI response rejected");
                (StatusCode::BAD_GATEWAY, "INVALID_AI_RESPONSE", message.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionNotFound => ApiError::SessionNotFound,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        ApiError::LlmUnavailable(err.to_string())
    }
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::InvalidInput(detail) => ApiError::BadRequest(detail),
            e @ FeatureError::Busy(_) => ApiError::SessionBusy(e.to_string()),
            FeatureError::Llm(e) => e.into(),
            FeatureError::InvalidAiResponse { message, source } => ApiError::InvalidAiResponse {
                message: message.to_string(),
                detail: source.to_string(),
            },
            FeatureError::State(e) => ApiError::Internal(e.to_string()),
            FeatureError::Core(e) => e.into(),
        }
    }
}
