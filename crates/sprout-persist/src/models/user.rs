use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A registered user, created on first login
///
/// Immutable after creation except `last_login` and the provider-refreshed
/// `profile`. The identity exposed to the rest of the system is the `_id`
/// hex string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Account id assigned by the third-party login provider
    pub openid: String,
    /// Free-form login payload as delivered by the provider
    pub profile: serde_json::Value,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub last_login: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(openid: String, profile: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            openid,
            profile,
            created_at: now,
            last_login: now,
        }
    }

    pub fn user_id(&self) -> String {
        self.id.to_hex()
    }
}
