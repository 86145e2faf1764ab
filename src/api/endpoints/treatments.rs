//! `POST /api/treatments/plan`: generate a treatment plan.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, SessionContext};
use crate::features::treatments;
use crate::models::TreatmentPlan;

#[derive(Deserialize)]
pub struct TreatmentPlanRequest {
    pub condition: String,
    #[serde(default)]
    pub details: String,
}

pub async fn plan(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<TreatmentPlanRequest>,
) -> Result<Json<TreatmentPlan>, ApiError> {
    let plan =
        treatments::generate_plan(&ctx.core, &session.handle, &req.condition, &req.details).await?;
    Ok(Json(plan))
}
