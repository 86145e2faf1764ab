//! `POST /api/symptoms/check`: AI symptom checker.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, SessionContext};
use crate::features::symptoms::{self, SymptomOutcome};

#[derive(Deserialize)]
pub struct SymptomCheckRequest {
    pub symptoms: String,
}

pub async fn check(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<SymptomCheckRequest>,
) -> Result<Json<SymptomOutcome>, ApiError> {
    let outcome = symptoms::check_symptoms(&ctx.core, &session.handle, &req.symptoms).await?;
    Ok(Json(outcome))
}
