//! `POST /api/profile`: save the profile and fetch a health tip.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, SessionContext};
use crate::features::profile::{self, ProfileOutcome};
use crate::models::Profile;

pub async fn save(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<Profile>,
) -> Result<Json<ProfileOutcome>, ApiError> {
    let outcome = profile::save_profile(&ctx.core, &session.handle, req).await?;
    Ok(Json(outcome))
}
