use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestrator::TurnError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad, expired or malformed token, never distinguished outwardly
    #[error("Authentication failed")]
    Unauthorized,

    /// Thread missing or owned by someone else; the caller cannot tell
    #[error("Thread not found")]
    ThreadNotFoundOrForbidden,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Login provider error: {0}")]
    AuthProvider(#[from] sprout_auth::ProviderError),

    #[error("Token error: {0}")]
    Token(#[from] sprout_auth::AuthError),

    #[error("Thread allocation error: {0}")]
    ThreadAllocation(#[source] anyhow::Error),

    #[error("Storage error: {0}")]
    Persist(#[from] sprout_persist::PersistError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::ThreadNotFoundOrForbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::AuthProvider(ref e) => {
                tracing::error!("Login provider error: {}", e);
                (StatusCode::BAD_GATEWAY, "Login provider error".to_string())
            }
            ApiError::Token(ref e) => {
                tracing::error!("Token error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::ThreadAllocation(ref e) => {
                tracing::error!("Thread allocation error: {}", e);
                (StatusCode::BAD_GATEWAY, "Assistant service error".to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Turn(ref e) => turn_error_response(e),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn turn_error_response(error: &TurnError) -> (StatusCode, String) {
    match error {
        TurnError::NotConfigured => {
            tracing::error!("Chat rejected: assistant configuration missing");
            (StatusCode::INTERNAL_SERVER_ERROR, "Assistant not configured".to_string())
        }
        TurnError::Assistant(e) => {
            tracing::error!("Assistant service error: {}", e);
            (StatusCode::BAD_GATEWAY, "Assistant service error".to_string())
        }
        TurnError::RunFailed { status } => {
            tracing::error!("Assistant run ended as {}", status);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Assistant failed to generate a response".to_string(),
            )
        }
        TurnError::DeadlineExceeded(deadline) => {
            tracing::warn!("Assistant run abandoned after {:?}", deadline);
            (StatusCode::GATEWAY_TIMEOUT, "Assistant run timed out".to_string())
        }
        TurnError::EmptyReply => {
            tracing::error!("Assistant completed a run without a reply");
            (StatusCode::INTERNAL_SERVER_ERROR, "No response generated".to_string())
        }
        TurnError::Ledger(e) => {
            tracing::error!("Ledger write failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
