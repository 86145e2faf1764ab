//! Report endpoints.
//!
//! - `POST /api/reports/generate`: new synthetic window
//! - `POST /api/reports/summary`: AI insights on the stored window

use axum::body::Bytes;
use axum::extract::State;
use axum::{Extension, Json};
use chrono::Local;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::features::reports::{self, ReportSummaryOutcome, ReportWindow};
use crate::metrics::MetricsGenerator;

#[derive(Deserialize, Default)]
pub struct GenerateRequest {
    pub days: Option<u32>,
}

/// The body is optional; an empty one selects the default window.
pub async fn generate(
    Extension(session): Extension<SessionContext>,
    body: Bytes,
) -> Result<Json<ReportWindow>, ApiError> {
    let req = parse_generate_request(&body)?;
    let mut generator = MetricsGenerator::from_entropy();
    let window = reports::generate_window(
        &session.handle,
        &mut generator,
        req.days,
        Local::now().date_naive(),
    )?;
    Ok(Json(window))
}

fn parse_generate_request(body: &[u8]) -> Result<GenerateRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid report request: {e}")))
}

pub async fn summary(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ReportSummaryOutcome>, ApiError> {
    let mut generator = MetricsGenerator::from_entropy();
    let outcome = reports::summarize(
        &ctx.core,
        &session.handle,
        &mut generator,
        Local::now().date_naive(),
    )
    .await?;
    Ok(Json(outcome))
}
