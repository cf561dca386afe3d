use mongodb::{bson::doc, Client, Collection};

use crate::error::Result;
use crate::models::ThreadRecord;

#[derive(Clone)]
pub struct ThreadRepository {
    collection: Collection<ThreadRecord>,
}

impl ThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    /// Record ownership of an externally-issued thread id
    pub async fn create(&self, thread_id: String, user_id: String) -> Result<ThreadRecord> {
        let record = ThreadRecord::new(thread_id, user_id);
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    /// Look up a thread only if it is owned by the given user
    ///
    /// A missing thread and a thread owned by someone else both return
    /// `None`; callers cannot tell the two apart.
    pub async fn find_owned(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<Option<ThreadRecord>> {
        let filter = doc! { "thread_id": thread_id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }
}
