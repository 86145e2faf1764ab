//! Audit logging middleware.
//!
//! Logs every API request with session id, method, path, status and
//! latency. Runs innermost (after the session has been resolved).

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::SessionContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let session_id = req
        .extensions()
        .get::<SessionContext>()
        .map(|s| s.id().to_string())
        .unwrap_or_else(|| "-".to_string());
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(%method, %path, %session_id, status, elapsed_ms, "API request");
    } else {
        tracing::info!(%method, %path, %session_id, status, elapsed_ms, "API request");
    }

    response
}
