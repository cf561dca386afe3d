use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection};

use crate::error::Result;
use crate::models::MessageRecord;

#[derive(Clone)]
pub struct MessageRepository {
    collection: Collection<MessageRecord>,
}

impl MessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    /// Append a user turn to the ledger
    pub async fn append(&self, record: &MessageRecord) -> Result<ObjectId> {
        self.collection.insert_one(record).await?;
        Ok(record.id)
    }

    /// All user turns for a thread, oldest first
    pub async fn for_thread(&self, thread_id: &str) -> Result<Vec<MessageRecord>> {
        let filter = doc! { "thread_id": thread_id };
        let messages = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }
}
