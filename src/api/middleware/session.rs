//! Session resolution middleware.
//!
//! Extracts `X-Session-Id`, resolves it against the session registry and
//! injects `SessionContext` into request extensions for downstream
//! handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext, SESSION_HEADER};

/// Require a live session.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn require_session(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_session_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let raw = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::SessionRequired)?;

    // A malformed id can never name a live session.
    let id = Uuid::parse_str(raw).map_err(|_| ApiError::SessionNotFound)?;
    let handle = ctx.core.session(&id)?;

    req.extensions_mut().insert(SessionContext { handle });
    Ok(next.run(req).await)
}
