use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity extracted from a bearer token
///
/// Which check failed (missing header, malformed token, bad signature,
/// expiry) is logged but never surfaced; the caller always sees the same
/// authentication failure.
pub struct AuthUser(pub String);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        match state.token_signer.verify(token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                tracing::debug!("Token rejected: {}", e);
                Err(ApiError::Unauthorized)
            }
        }
    }
}
