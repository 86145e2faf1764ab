//! Navigation and view endpoints.
//!
//! - `GET /api/navigation`: navigation bar with the active section
//! - `POST /api/navigation`: select a section
//! - `GET /api/view`: render the active section

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, SessionContext};
use crate::sections::{self, NavItem, Section, View};

#[derive(Serialize)]
pub struct NavigationResponse {
    pub current_section: Section,
    pub items: Vec<NavItem>,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub section: Section,
}

#[derive(Serialize)]
pub struct NavigateResponse {
    pub current_section: Section,
    /// `false` when the section was already selected.
    pub changed: bool,
}

/// `GET /api/navigation`
pub async fn bar(
    Extension(session): Extension<SessionContext>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let current_section = session.handle.lock()?.current_section();
    Ok(Json(NavigationResponse {
        current_section,
        items: sections::navigation_bar(current_section),
    }))
}

/// `POST /api/navigation`
pub async fn navigate(
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<NavigateRequest>,
) -> Result<Json<NavigateResponse>, ApiError> {
    let changed = session
        .handle
        .lock()?
        .navigate(req.section)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if changed {
        tracing::debug!(session_id = %session.id(), section = %req.section, "Section selected");
    }
    Ok(Json(NavigateResponse {
        current_section: req.section,
        changed,
    }))
}

/// `GET /api/view`
pub async fn view(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<View>, ApiError> {
    let settings = ctx.core.llm().settings();
    let state = session.handle.lock()?;
    Ok(Json(sections::render(
        state.current_section(),
        &state,
        &settings,
    )))
}
