//! Session lifecycle endpoints.
//!
//! - `POST /api/sessions`: start a session
//! - `DELETE /api/sessions/current`: end the caller's session

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::sections::Section;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub current_section: Section,
}

/// `POST /api/sessions`: new session with freshly initialised state.
pub async fn create(
    State(ctx): State<ApiContext>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let handle = ctx.core.create_session()?;
    let current_section = handle.lock()?.current_section();

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: handle.id().to_string(),
            current_section,
        }),
    ))
}

/// `DELETE /api/sessions/current`: drop the session and all its data.
pub async fn end(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<StatusCode, ApiError> {
    ctx.core.end_session(&session.id())?;
    Ok(StatusCode::NO_CONTENT)
}
