use mongodb::{bson::doc, options::ReturnDocument, Client, Collection};

use crate::error::Result;
use crate::models::UserRecord;

#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<UserRecord>,
}

impl UserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    /// Find the user owning a provider account, or create one
    ///
    /// Every login lands here: an existing user gets its `last_login` and
    /// provider payload refreshed, a new provider account gets a fresh row.
    pub async fn upsert_by_openid(
        &self,
        openid: &str,
        profile: &serde_json::Value,
    ) -> Result<UserRecord> {
        let filter = doc! { "openid": openid };
        let update = doc! {
            "$set": {
                "last_login": bson::DateTime::now(),
                "profile": bson::to_bson(profile)?,
            }
        };

        let existing = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        if let Some(user) = existing {
            return Ok(user);
        }

        let user = UserRecord::new(openid.to_string(), profile.clone());
        self.collection.insert_one(&user).await?;
        Ok(user)
    }
}
