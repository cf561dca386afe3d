pub mod client;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repositories;

pub use client::PersistClient;
pub use error::PersistError;
pub use ledger::ConversationLedger;
pub use models::{MessageRecord, ProfileContext, ResponseRecord, ThreadRecord, UserRecord};
pub use repositories::{
    MessageRepository, ResponseRepository, ThreadRepository, UserRepository,
};
