use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    extract::AuthUser,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntry {
    /// "user" or "assistant"
    pub role: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub thread_id: String,
    pub entries: Vec<HistoryEntry>,
}

/// Read back a thread's ledger: user turns and assistant replies in order
#[utoipa::path(
    get,
    path = "/api/history/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread to read")
    ),
    responses(
        (status = 200, description = "Thread history", body = HistoryResponse),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Thread not found")
    ),
    tag = "history"
)]
pub async fn thread_history(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<HistoryResponse>> {
    state
        .persist
        .threads()
        .find_owned(&thread_id, &user_id)
        .await?
        .ok_or(ApiError::ThreadNotFoundOrForbidden)?;

    let messages = state.persist.messages().for_thread(&thread_id).await?;
    let responses = state.persist.responses().for_thread(&thread_id).await?;

    let mut entries: Vec<HistoryEntry> = messages
        .into_iter()
        .map(|m| HistoryEntry {
            role: "user".to_string(),
            text: m.text,
            question_type: Some(m.question_type),
            subcategory: m.subcategory,
            created_at: m.created_at,
        })
        .chain(responses.into_iter().map(|r| HistoryEntry {
            role: "assistant".to_string(),
            text: r.text,
            question_type: None,
            subcategory: None,
            created_at: r.created_at,
        }))
        .collect();

    // Messages and responses interleave monotonically by creation time
    entries.sort_by_key(|entry| entry.created_at);

    Ok(Json(HistoryResponse { thread_id, entries }))
}
