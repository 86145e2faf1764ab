//! `POST /api/chat/send`: one chat turn.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::{ApiContext, SessionContext};
use crate::features::chat::{self, ChatOutcome};

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub message: String,
}

pub async fn send(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    ApiJson(req): ApiJson<ChatSendRequest>,
) -> Result<Json<ChatOutcome>, ApiError> {
    let outcome = chat::send_message(&ctx.core, &session.handle, &req.message).await?;
    Ok(Json(outcome))
}
