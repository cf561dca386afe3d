use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims embedded in access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, the user id
    pub sub: String,
    /// Expiry (unix timestamp)
    pub exp: i64,
    /// Issued at (unix timestamp)
    pub iat: i64,
}

/// HMAC access-token primitive
///
/// Stateless: tokens are verified by signature and expiry only, never
/// looked up.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a signed, time-bounded token for a user
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Signing)
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::TokenInvalidSignature,
                _ => AuthError::TokenMalformed,
            }
        })?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 30)
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let signer = signer();
        let token = signer.issue("user-42").unwrap();
        assert_eq!(signer.verify(&token).unwrap(), "user-42");
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = signer();
        // Expiry well past the default validation leeway
        let now = Utc::now();
        let claims = TokenClaims {
            sub: "user-42".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &signer.encoding_key).unwrap();

        assert!(matches!(
            signer.verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenSigner::new("other-secret", 30).issue("user-42").unwrap();
        assert!(matches!(
            signer().verify(&token),
            Err(AuthError::TokenInvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            signer().verify("not.a.token"),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn expired_token_with_foreign_signature_still_fails() {
        let other = TokenSigner::new("other-secret", 30);
        let now = Utc::now();
        let claims = TokenClaims {
            sub: "user-42".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &other.encoding_key).unwrap();

        assert!(signer().verify(&token).is_err());
    }

    #[test]
    fn token_lifetime_matches_configured_ttl() {
        let signer = TokenSigner::new("test-secret", 30);
        let token = signer.issue("user-42").unwrap();

        // Decode without expiry validation to inspect the raw claims
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data =
            decode::<TokenClaims>(&token, &signer.decoding_key, &validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 30 * 24 * 3600);
    }
}
