//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_id: String,
    pub active_sessions: usize,
    pub llm_busy: bool,
}

/// `GET /api/health`: liveness check, no session required.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model_id: ctx.core.llm().settings().model_id,
        active_sessions: ctx.core.session_count(),
        llm_busy: ctx.core.llm().is_busy(),
    })
}
