use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One assistant reply, written to the ledger only after a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub thread_id: String,
    pub user_id: String,
    pub text: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn new(thread_id: String, user_id: String, text: String) -> Self {
        Self {
            id: ObjectId::new(),
            thread_id,
            user_id,
            text,
            created_at: Utc::now(),
        }
    }
}
