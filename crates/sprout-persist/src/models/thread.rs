use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Ownership row binding an externally-issued thread id to one user
///
/// Immutable. Every operation referencing `thread_id` must match both the
/// id and the owner, or fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Thread id issued by the assistant service
    pub thread_id: String,
    pub user_id: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ThreadRecord {
    pub fn new(thread_id: String, user_id: String) -> Self {
        Self {
            id: ObjectId::new(),
            thread_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
