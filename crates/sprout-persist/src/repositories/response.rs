use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection};

use crate::error::Result;
use crate::models::ResponseRecord;

#[derive(Clone)]
pub struct ResponseRepository {
    collection: Collection<ResponseRecord>,
}

impl ResponseRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("responses");
        Self { collection }
    }

    /// Append an assistant reply to the ledger
    pub async fn append(&self, record: &ResponseRecord) -> Result<ObjectId> {
        self.collection.insert_one(record).await?;
        Ok(record.id)
    }

    /// All assistant replies for a thread, oldest first
    pub async fn for_thread(&self, thread_id: &str) -> Result<Vec<ResponseRecord>> {
        let filter = doc! { "thread_id": thread_id };
        let responses = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(responses)
    }
}
