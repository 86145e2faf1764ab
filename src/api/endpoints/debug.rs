//! `GET /api/debug/state`: the whole session store, verbatim.

use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::SessionContext;

#[derive(Serialize)]
pub struct DebugStateResponse {
    pub session_id: String,
    pub created_at: String,
    pub state: serde_json::Value,
}

pub async fn state(
    Extension(session): Extension<SessionContext>,
) -> Result<Json<DebugStateResponse>, ApiError> {
    let state = session.handle.lock()?;
    Ok(Json(DebugStateResponse {
        session_id: state.id.to_string(),
        created_at: state.created_at.to_rfc3339(),
        state: state.store().snapshot(),
    }))
}
