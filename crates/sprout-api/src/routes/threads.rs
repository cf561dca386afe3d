use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    extract::AuthUser,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ThreadResponse {
    pub thread_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClearThreadRequest {
    pub thread_id: String,
}

/// Create a new conversation thread owned by the caller
#[utoipa::path(
    post,
    path = "/api/thread",
    responses(
        (status = 201, description = "Thread created", body = ThreadResponse),
        (status = 401, description = "Authentication failed"),
        (status = 502, description = "Assistant service could not allocate a thread")
    ),
    tag = "threads"
)]
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<(StatusCode, Json<ThreadResponse>)> {
    let record = allocate_thread(&state, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ThreadResponse {
            thread_id: record.thread_id,
        }),
    ))
}

/// Start over: retire a thread by handing the caller a fresh one
///
/// The old thread's ledger entries are kept; nothing is deleted.
#[utoipa::path(
    post,
    path = "/api/clear",
    request_body = ClearThreadRequest,
    responses(
        (status = 200, description = "Replacement thread created", body = ThreadResponse),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Thread not found")
    ),
    tag = "threads"
)]
pub async fn clear_thread(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ClearThreadRequest>,
) -> ApiResult<Json<ThreadResponse>> {
    state
        .persist
        .threads()
        .find_owned(&req.thread_id, &user_id)
        .await?
        .ok_or(ApiError::ThreadNotFoundOrForbidden)?;

    let record = allocate_thread(&state, user_id).await?;

    Ok(Json(ThreadResponse {
        thread_id: record.thread_id,
    }))
}

/// Obtain an externally-issued thread id and record its ownership
async fn allocate_thread(
    state: &AppState,
    user_id: String,
) -> ApiResult<sprout_persist::ThreadRecord> {
    let thread_id = state
        .assistant
        .create_thread()
        .await
        .map_err(ApiError::ThreadAllocation)?;

    let record = state.persist.threads().create(thread_id, user_id).await?;

    tracing::info!(thread_id = %record.thread_id, user_id = %record.user_id, "Thread created");

    Ok(record)
}
