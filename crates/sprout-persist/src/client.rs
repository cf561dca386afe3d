use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Client, Database, IndexModel};

use crate::error::{PersistError, Result};
use crate::ledger::ConversationLedger;
use crate::models::{MessageRecord, ResponseRecord};
use crate::repositories::{
    MessageRepository, ResponseRepository, ThreadRepository, UserRepository,
};

pub struct PersistClient {
    database: Database,
    user_repo: UserRepository,
    thread_repo: ThreadRepository,
    message_repo: MessageRepository,
    response_repo: ResponseRepository,
}

impl PersistClient {
    pub async fn connect(mongodb_uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let database = client.database(db_name);
        let user_repo = UserRepository::new(&client, db_name);
        let thread_repo = ThreadRepository::new(&client, db_name);
        let message_repo = MessageRepository::new(&client, db_name);
        let response_repo = ResponseRepository::new(&client, db_name);

        Ok(Self {
            database,
            user_repo,
            thread_repo,
            message_repo,
            response_repo,
        })
    }

    pub fn users(&self) -> &UserRepository {
        &self.user_repo
    }

    pub fn threads(&self) -> &ThreadRepository {
        &self.thread_repo
    }

    pub fn messages(&self) -> &MessageRepository {
        &self.message_repo
    }

    pub fn responses(&self) -> &ResponseRepository {
        &self.response_repo
    }

    /// Create the indexes every lookup path depends on
    ///
    /// Idempotent; runs at startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique = IndexOptions::builder().unique(true).build();

        self.database
            .collection::<bson::Document>("users")
            .create_indexes(vec![
                IndexModel::builder()
                    .keys(doc! { "openid": 1 })
                    .options(unique)
                    .build(),
                IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
                IndexModel::builder().keys(doc! { "last_login": 1 }).build(),
            ])
            .await?;

        self.database
            .collection::<bson::Document>("threads")
            .create_indexes(vec![
                IndexModel::builder().keys(doc! { "thread_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
            ])
            .await?;

        self.database
            .collection::<bson::Document>("messages")
            .create_indexes(vec![
                IndexModel::builder().keys(doc! { "thread_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
                IndexModel::builder()
                    .keys(doc! { "question_type": 1 })
                    .build(),
            ])
            .await?;

        self.database
            .collection::<bson::Document>("responses")
            .create_indexes(vec![
                IndexModel::builder().keys(doc! { "thread_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
            ])
            .await?;

        tracing::info!("Database indexes ensured");
        Ok(())
    }

    /// Liveness probe against the database
    pub async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[async_trait]
impl ConversationLedger for PersistClient {
    async fn append_message(&self, record: &MessageRecord) -> Result<()> {
        self.message_repo.append(record).await?;
        Ok(())
    }

    async fn append_response(&self, record: &ResponseRecord) -> Result<()> {
        self.response_repo.append(record).await?;
        Ok(())
    }
}
