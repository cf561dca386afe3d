// Third-party login exchange (HTTP direct, no SDK)

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ProviderError;

const WECHAT_API_BASE: &str = "https://api.weixin.qq.com";

/// Identity assigned by the third-party login provider
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    /// Stable per-account id; the same login code always resolves to the
    /// same openid
    pub openid: String,
}

/// Trait for exchanging a third-party login proof for a provider identity
#[async_trait]
pub trait LoginProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, ProviderError>;
}

/// WeChat mini-program login client (`jscode2session`)
pub struct WeChatLoginProvider {
    http_client: reqwest::Client,
    app_id: String,
    app_secret: String,
    base_url: String,
}

impl WeChatLoginProvider {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            base_url: WECHAT_API_BASE.to_string(),
        }
    }

}

#[async_trait]
impl LoginProvider for WeChatLoginProvider {
    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, ProviderError> {
        // The provider reports failures in-band with a 200 status
        let session: SessionResponse = self
            .http_client
            .get(format!("{}/sns/jscode2session", self.base_url))
            .query(&[
                ("appid", self.app_id.as_str()),
                ("secret", self.app_secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .json()
            .await?;

        match session.openid {
            Some(openid) => Ok(ProviderIdentity { openid }),
            None => {
                tracing::warn!(
                    errcode = session.errcode,
                    "Login provider rejected the code"
                );
                Err(ProviderError::Rejected {
                    code: session.errcode,
                    message: session.errmsg,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    openid: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_response_parses_success() {
        let json = r#"{"openid": "oGZUI0egBJY1zhBYw2KhdUfwVJJE", "session_key": "k"}"#;
        let session: SessionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(session.openid.as_deref(), Some("oGZUI0egBJY1zhBYw2KhdUfwVJJE"));
    }

    #[test]
    fn session_response_parses_rejection() {
        let json = r#"{"errcode": 40029, "errmsg": "invalid code"}"#;
        let session: SessionResponse = serde_json::from_str(json).unwrap();
        assert!(session.openid.is_none());
        assert_eq!(session.errcode, 40029);
    }
}
