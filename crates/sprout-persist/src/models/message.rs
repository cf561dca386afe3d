use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::ProfileContext;

/// One user turn, written to the ledger before the run is submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub thread_id: String,
    pub user_id: String,
    pub text: String,
    pub profile: ProfileContext,
    pub question_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(
        thread_id: String,
        user_id: String,
        text: String,
        profile: ProfileContext,
        question_type: String,
        subcategory: Option<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            thread_id,
            user_id,
            text,
            profile,
            question_type,
            subcategory,
            created_at: Utc::now(),
        }
    }
}
