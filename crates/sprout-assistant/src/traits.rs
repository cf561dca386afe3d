use crate::types::RunStatus;
use anyhow::Result;
use async_trait::async_trait;

/// Trait for the hosted assistant-run service
///
/// The service owns conversation threads and executes runs asynchronously on
/// its own schedule; callers submit a message, start a run, and poll it.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Allocate a new conversation thread and return its external id
    async fn create_thread(&self) -> Result<String>;

    /// Append a user message to an existing thread
    async fn append_user_message(&self, thread_id: &str, text: &str) -> Result<()>;

    /// Start a run on a thread and return the run id
    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<String>;

    /// Fetch the current status of a run
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus>;

    /// Fetch the newest assistant reply on a thread, if any
    async fn latest_reply(&self, thread_id: &str) -> Result<Option<String>>;

    /// Cheap reachability probe against the service
    async fn ping(&self) -> Result<()>;
}
