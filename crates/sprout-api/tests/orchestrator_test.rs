use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use sprout_api::orchestrator::{TurnConfig, TurnError, TurnOrchestrator, TurnRequest};
use sprout_assistant::{AssistantClient, RunStatus};
use sprout_persist::{
    ConversationLedger, MessageRecord, PersistError, ProfileContext, ResponseRecord,
};

/// Scripted assistant: pops one status per poll, repeating the last one
struct FakeAssistant {
    statuses: Mutex<Vec<RunStatus>>,
    reply: Option<String>,
    fail_start_run: bool,
    calls: AtomicUsize,
}

impl FakeAssistant {
    fn new(statuses: Vec<RunStatus>, reply: Option<&str>) -> Self {
        Self {
            statuses: Mutex::new(statuses),
            reply: reply.map(str::to_string),
            fail_start_run: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_on_start() -> Self {
        Self {
            statuses: Mutex::new(Vec::new()),
            reply: None,
            fail_start_run: true,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistantClient for FakeAssistant {
    async fn create_thread(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("thread_fake".to_string())
    }

    async fn append_user_message(&self, _thread_id: &str, _text: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn start_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start_run {
            anyhow::bail!("service unavailable");
        }
        Ok("run_fake".to_string())
    }

    async fn run_status(&self, _thread_id: &str, _run_id: &str) -> Result<RunStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.remove(0))
        } else {
            Ok(statuses.first().copied().unwrap_or(RunStatus::InProgress))
        }
    }

    async fn latest_reply(&self, _thread_id: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// In-memory ledger recording every append
#[derive(Default)]
struct MemoryLedger {
    messages: Mutex<Vec<MessageRecord>>,
    responses: Mutex<Vec<ResponseRecord>>,
    fail_response_writes: bool,
}

impl MemoryLedger {
    fn failing_on_response() -> Self {
        Self {
            fail_response_writes: true,
            ..Self::default()
        }
    }

    fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    fn response_count(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ConversationLedger for MemoryLedger {
    async fn append_message(&self, record: &MessageRecord) -> Result<(), PersistError> {
        self.messages.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn append_response(&self, record: &ResponseRecord) -> Result<(), PersistError> {
        if self.fail_response_writes {
            return Err(PersistError::Connection("store went away".to_string()));
        }
        self.responses.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn profile() -> ProfileContext {
    ProfileContext {
        child_age: "4".to_string(),
        child_personality: "curious".to_string(),
        kindergarten: "yes".to_string(),
        interests: "dinosaurs".to_string(),
        languages: "english".to_string(),
        family_members: 3,
        has_siblings: "no".to_string(),
        siblings_age: None,
    }
}

fn turn() -> TurnRequest {
    TurnRequest {
        thread_id: "thread_1".to_string(),
        user_id: "user_1".to_string(),
        question: "How much sleep does a four year old need?".to_string(),
        profile: profile(),
        question_type: "sleep".to_string(),
        subcategory: None,
    }
}

fn config(poll_ms: u64, deadline_secs: u64) -> TurnConfig {
    TurnConfig {
        assistant_id: Some("asst_fake".to_string()),
        poll_interval: Duration::from_millis(poll_ms),
        run_deadline: Duration::from_secs(deadline_secs),
    }
}

fn orchestrator(
    assistant: Arc<FakeAssistant>,
    ledger: Arc<MemoryLedger>,
    config: TurnConfig,
) -> TurnOrchestrator {
    TurnOrchestrator::new(assistant, ledger, config)
}

#[tokio::test(start_paused = true)]
async fn completed_run_returns_reply_and_writes_both_records() {
    let assistant = Arc::new(FakeAssistant::new(
        vec![RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed],
        Some("Around 11 to 12 hours."),
    ));
    let ledger = Arc::new(MemoryLedger::default());
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 30));

    let reply = orchestrator.run_turn(turn()).await.unwrap();

    assert_eq!(reply, "Around 11 to 12 hours.");
    assert_eq!(ledger.message_count(), 1);
    assert_eq!(ledger.response_count(), 1);

    let messages = ledger.messages.lock().unwrap();
    assert_eq!(messages[0].thread_id, "thread_1");
    assert_eq!(messages[0].user_id, "user_1");
    // The ledger keeps the raw question, not the rendered prompt
    assert_eq!(messages[0].text, "How much sleep does a four year old need?");

    let responses = ledger.responses.lock().unwrap();
    assert_eq!(responses[0].thread_id, "thread_1");
    assert_eq!(responses[0].text, "Around 11 to 12 hours.");
}

#[tokio::test(start_paused = true)]
async fn failed_run_writes_message_but_no_response() {
    let assistant = Arc::new(FakeAssistant::new(
        vec![RunStatus::InProgress, RunStatus::Failed],
        Some("never fetched"),
    ));
    let ledger = Arc::new(MemoryLedger::default());
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 30));

    let err = orchestrator.run_turn(turn()).await.unwrap_err();

    assert!(matches!(err, TurnError::RunFailed { status: "failed" }));
    assert_eq!(ledger.message_count(), 1);
    assert_eq!(ledger.response_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn expired_run_is_a_terminal_failure() {
    let assistant = Arc::new(FakeAssistant::new(vec![RunStatus::Expired], None));
    let ledger = Arc::new(MemoryLedger::default());
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 30));

    let err = orchestrator.run_turn(turn()).await.unwrap_err();

    assert!(matches!(err, TurnError::RunFailed { status: "expired" }));
    assert_eq!(ledger.response_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn deadline_bounds_the_polling_loop() {
    // Never reaches a terminal state
    let assistant = Arc::new(FakeAssistant::new(vec![RunStatus::InProgress], None));
    let ledger = Arc::new(MemoryLedger::default());
    let poll_interval = Duration::from_millis(500);
    let deadline = Duration::from_secs(3);
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 3));

    let started = tokio::time::Instant::now();
    let err = orchestrator.run_turn(turn()).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, TurnError::DeadlineExceeded(_)));
    assert!(elapsed >= deadline, "gave up early: {:?}", elapsed);
    assert!(
        elapsed < deadline + poll_interval,
        "kept polling past the deadline: {:?}",
        elapsed
    );
    assert_eq!(ledger.message_count(), 1);
    assert_eq!(ledger.response_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_reply_on_completion_is_a_protocol_violation() {
    let assistant = Arc::new(FakeAssistant::new(vec![RunStatus::Completed], None));
    let ledger = Arc::new(MemoryLedger::default());
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 30));

    let err = orchestrator.run_turn(turn()).await.unwrap_err();

    assert!(matches!(err, TurnError::EmptyReply));
    assert_eq!(ledger.message_count(), 1);
    assert_eq!(ledger.response_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_configuration_fails_before_any_call_or_write() {
    let assistant = Arc::new(FakeAssistant::new(vec![RunStatus::Completed], Some("r")));
    let ledger = Arc::new(MemoryLedger::default());
    let orchestrator = TurnOrchestrator::new(
        assistant.clone(),
        ledger.clone(),
        TurnConfig {
            assistant_id: None,
            poll_interval: Duration::from_millis(500),
            run_deadline: Duration::from_secs(30),
        },
    );

    let err = orchestrator.run_turn(turn()).await.unwrap_err();

    assert!(matches!(err, TurnError::NotConfigured));
    assert_eq!(assistant.call_count(), 0);
    assert_eq!(ledger.message_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn message_is_durable_even_when_submission_fails() {
    let assistant = Arc::new(FakeAssistant::failing_on_start());
    let ledger = Arc::new(MemoryLedger::default());
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 30));

    let err = orchestrator.run_turn(turn()).await.unwrap_err();

    assert!(matches!(err, TurnError::Assistant(_)));
    assert_eq!(ledger.message_count(), 1);
    assert_eq!(ledger.response_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_response_write_surfaces_after_successful_run() {
    let assistant = Arc::new(FakeAssistant::new(
        vec![RunStatus::Completed],
        Some("a reply the ledger loses"),
    ));
    let ledger = Arc::new(MemoryLedger::failing_on_response());
    let orchestrator = orchestrator(assistant, ledger.clone(), config(500, 30));

    let err = orchestrator.run_turn(turn()).await.unwrap_err();

    assert!(matches!(err, TurnError::Ledger(_)));
    assert_eq!(ledger.message_count(), 1);
    assert_eq!(ledger.response_count(), 0);
}
