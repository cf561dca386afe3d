use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use sprout_persist::ProfileContext;

use crate::{
    error::{ApiError, ApiResult},
    extract::AuthUser,
    orchestrator::TurnRequest,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub thread_id: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub profile: ProfileContext,
    pub question_type: String,
    #[serde(default)]
    pub subcategory: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub message: String,
    pub thread_id: String,
}

/// Submit one user turn and wait for the assistant's reply
///
/// Ownership is verified first; the orchestrator then records the question,
/// drives the external run to a terminal state under the deadline, and
/// records the reply. Exactly one reply or one failure per call.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Thread not found"),
        (status = 500, description = "Assistant or storage failure"),
        (status = 504, description = "Assistant run timed out")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    state
        .persist
        .threads()
        .find_owned(&req.thread_id, &user_id)
        .await?
        .ok_or(ApiError::ThreadNotFoundOrForbidden)?;

    let reply = state
        .orchestrator
        .run_turn(TurnRequest {
            thread_id: req.thread_id.clone(),
            user_id,
            question: req.message,
            profile: req.profile,
            question_type: req.question_type,
            subcategory: req.subcategory,
        })
        .await?;

    Ok(Json(ChatResponse {
        message: reply,
        thread_id: req.thread_id,
    }))
}
