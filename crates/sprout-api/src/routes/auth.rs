use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// One-shot login code from the third-party provider
    pub code: String,
    /// Provider-defined profile payload, stored as delivered
    #[serde(default)]
    #[schema(value_type = Object)]
    pub profile: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
}

/// Exchange a third-party login code for an access token
///
/// Creates the user on first login; later logins reuse the same identity
/// and refresh `last_login`.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 502, description = "Login provider rejected the exchange")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let identity = state.provider.exchange_code(&req.code).await?;

    let user = state
        .persist
        .users()
        .upsert_by_openid(&identity.openid, &req.profile)
        .await?;

    let user_id = user.user_id();
    let token = state.token_signer.issue(&user_id)?;

    tracing::info!(user_id = %user_id, "Login succeeded");

    Ok(Json(LoginResponse { token, user_id }))
}
