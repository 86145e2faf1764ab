//! Chronic-condition endpoints.
//!
//! - `POST /api/conditions/glucose`
//! - `POST /api/conditions/blood-pressure`
//! - `POST /api/conditions/asthma`

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, SessionContext};
use crate::features::conditions::{self, LogOutcome};
use crate::models::{AsthmaEpisode, BloodPressureReading, GlucoseReading};

#[derive(Deserialize)]
pub struct GlucoseRequest {
    pub mg_dl: u16,
}

#[derive(Deserialize)]
pub struct BloodPressureRequest {
    pub systolic: u16,
    pub diastolic: u16,
}

#[derive(Deserialize)]
pub struct AsthmaRequest {
    pub triggers: String,
    pub severity: u8,
}

pub async fn glucose(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<GlucoseRequest>,
) -> Result<Json<LogOutcome<GlucoseReading>>, ApiError> {
    let outcome = conditions::log_glucose(&ctx.core, &session.handle, req.mg_dl).await?;
    Ok(Json(outcome))
}

pub async fn blood_pressure(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<BloodPressureRequest>,
) -> Result<Json<LogOutcome<BloodPressureReading>>, ApiError> {
    let outcome =
        conditions::log_blood_pressure(&ctx.core, &session.handle, req.systolic, req.diastolic)
            .await?;
    Ok(Json(outcome))
}

pub async fn asthma(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<AsthmaRequest>,
) -> Result<Json<LogOutcome<AsthmaEpisode>>, ApiError> {
    let outcome =
        conditions::log_asthma(&ctx.core, &session.handle, &req.triggers, req.severity).await?;
    Ok(Json(outcome))
}
