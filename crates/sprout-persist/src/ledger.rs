use async_trait::async_trait;

use crate::error::Result;
use crate::models::{MessageRecord, ResponseRecord};

/// Append-only writer for the conversation ledger
///
/// The orchestrator only ever appends: a Message before the run is
/// submitted, a Response after a completed run. No update or delete
/// operations are exposed.
#[async_trait]
pub trait ConversationLedger: Send + Sync {
    /// Durably record a user turn
    async fn append_message(&self, record: &MessageRecord) -> Result<()>;

    /// Durably record an assistant reply
    async fn append_response(&self, record: &ResponseRecord) -> Result<()>;
}
