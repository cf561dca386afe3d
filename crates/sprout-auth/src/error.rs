use thiserror::Error;

/// Access-token verification failures
///
/// The kinds are distinct internally (logs, tests) but every one of them is
/// presented to callers as the same authentication failure.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("malformed access token")]
    TokenMalformed,

    #[error("access token expired")]
    TokenExpired,

    #[error("access token signature mismatch")]
    TokenInvalidSignature,

    #[error("failed to sign access token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Third-party login exchange failures
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("login provider unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("login provider rejected the code ({code}): {message}")]
    Rejected { code: i64, message: String },
}
