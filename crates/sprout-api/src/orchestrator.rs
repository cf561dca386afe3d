use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use sprout_assistant::{AssistantClient, RunDisposition};
use sprout_persist::{ConversationLedger, MessageRecord, PersistError, ProfileContext, ResponseRecord};

/// Orchestrator settings, fixed at startup
#[derive(Debug, Clone)]
pub struct TurnConfig {
    /// Assistant to run; `None` when endpoint credentials are missing
    pub assistant_id: Option<String>,
    pub poll_interval: Duration,
    pub run_deadline: Duration,
}

/// One user turn, ownership already verified by the caller
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub thread_id: String,
    pub user_id: String,
    pub question: String,
    pub profile: ProfileContext,
    pub question_type: String,
    pub subcategory: Option<String>,
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("assistant configuration missing")]
    NotConfigured,

    #[error("assistant service error: {0}")]
    Assistant(#[source] anyhow::Error),

    #[error("assistant run ended as {status}")]
    RunFailed { status: &'static str },

    #[error("assistant run did not reach a terminal state within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("assistant completed the run without producing a reply")]
    EmptyReply,

    #[error("failed to record the turn: {0}")]
    Ledger(#[from] PersistError),
}

/// Drives one user message to exactly one assistant reply, or a definitive
/// failure, within a bounded wall-clock deadline.
///
/// The assistant executes runs asynchronously on its own schedule; this
/// orchestrator submits the turn, then suspends on a timer between status
/// polls until the run is terminal or the deadline passes. The Message is
/// durable before the run is submitted; the Response is written only after
/// a completed run. Nothing is retried or rolled back here; retry is a
/// client-initiated new call.
pub struct TurnOrchestrator {
    assistant: Arc<dyn AssistantClient>,
    ledger: Arc<dyn ConversationLedger>,
    config: TurnConfig,
}

impl TurnOrchestrator {
    pub fn new(
        assistant: Arc<dyn AssistantClient>,
        ledger: Arc<dyn ConversationLedger>,
        config: TurnConfig,
    ) -> Self {
        Self {
            assistant,
            ledger,
            config,
        }
    }

    pub async fn run_turn(&self, turn: TurnRequest) -> Result<String, TurnError> {
        // Checked before any external call or write
        let assistant_id = self
            .config
            .assistant_id
            .as_deref()
            .ok_or(TurnError::NotConfigured)?;

        // History must survive even if the run never completes
        let message = MessageRecord::new(
            turn.thread_id.clone(),
            turn.user_id.clone(),
            turn.question.clone(),
            turn.profile.clone(),
            turn.question_type.clone(),
            turn.subcategory.clone(),
        );
        self.ledger.append_message(&message).await?;

        let prompt = render_turn_prompt(&turn);
        self.assistant
            .append_user_message(&turn.thread_id, &prompt)
            .await
            .map_err(TurnError::Assistant)?;

        let run_id = self
            .assistant
            .start_run(&turn.thread_id, assistant_id)
            .await
            .map_err(TurnError::Assistant)?;

        tracing::debug!(
            thread_id = %turn.thread_id,
            run_id = %run_id,
            "Run submitted"
        );

        let reply = self.poll_to_completion(&turn.thread_id, &run_id).await?;

        let response = ResponseRecord::new(
            turn.thread_id.clone(),
            turn.user_id.clone(),
            reply.clone(),
        );
        self.ledger.append_response(&response).await?;

        Ok(reply)
    }

    /// Poll the run at a fixed interval until it is terminal or the
    /// deadline passes.
    ///
    /// Suspension is cooperative: the task yields between polls and never
    /// blocks other requests. A deadline hit abandons the run; the service
    /// may still finish it later, but this turn reports a timeout. No
    /// cancellation is propagated; the service exposes none.
    async fn poll_to_completion(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<String, TurnError> {
        let submitted = Instant::now();

        loop {
            if submitted.elapsed() >= self.config.run_deadline {
                tracing::warn!(
                    thread_id = %thread_id,
                    run_id = %run_id,
                    "Run abandoned at deadline"
                );
                return Err(TurnError::DeadlineExceeded(self.config.run_deadline));
            }

            tokio::time::sleep(self.config.poll_interval).await;

            let status = self
                .assistant
                .run_status(thread_id, run_id)
                .await
                .map_err(TurnError::Assistant)?;

            match status.disposition() {
                RunDisposition::Pending => continue,
                RunDisposition::Failed => {
                    return Err(TurnError::RunFailed {
                        status: status.as_str(),
                    });
                }
                RunDisposition::Succeeded => {
                    // An empty reply list on a completed run is a protocol
                    // violation, not a run failure
                    return self
                        .assistant
                        .latest_reply(thread_id)
                        .await
                        .map_err(TurnError::Assistant)?
                        .ok_or(TurnError::EmptyReply);
                }
            }
        }
    }
}

/// Render the text submitted to the assistant: profile context and question
/// classification ahead of the question itself.
pub fn render_turn_prompt(turn: &TurnRequest) -> String {
    use std::fmt::Write;

    let p = &turn.profile;
    let mut prompt = String::new();
    let _ = writeln!(prompt, "User Information:");
    let _ = writeln!(prompt, "Child's Age: {}", p.child_age);
    let _ = writeln!(prompt, "Personality Traits: {}", p.child_personality);
    let _ = writeln!(prompt, "In Kindergarten: {}", p.kindergarten);
    let _ = writeln!(prompt, "Interests: {}", p.interests);
    let _ = writeln!(prompt, "Languages at Home: {}", p.languages);
    let _ = writeln!(prompt, "Family Members: {}", p.family_members);
    let _ = writeln!(prompt, "Has Siblings: {}", p.has_siblings);
    if let Some(ages) = &p.siblings_age {
        let _ = writeln!(prompt, "Siblings' Ages: {}", ages);
    }
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Question Type: {}", turn.question_type);
    if let Some(topic) = &turn.subcategory {
        let _ = writeln!(prompt, "Specific Topic: {}", topic);
    }
    let _ = write!(prompt, "Question: {}", turn.question);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn prompt_carries_profile_and_question() {
        let turn = TurnRequest {
            thread_id: "thread_1".to_string(),
            user_id: "user_1".to_string(),
            question: "How much sleep does she need?".to_string(),
            profile: profile(),
            question_type: "sleep".to_string(),
            subcategory: Some("naps".to_string()),
        };

        let prompt = render_turn_prompt(&turn);
        assert!(prompt.contains("Child's Age: 4"));
        assert!(prompt.contains("Question Type: sleep"));
        assert!(prompt.contains("Specific Topic: naps"));
        assert!(prompt.ends_with("Question: How much sleep does she need?"));
    }

    #[test]
    fn prompt_omits_absent_optional_lines() {
        let turn = TurnRequest {
            thread_id: "thread_1".to_string(),
            user_id: "user_1".to_string(),
            question: "q".to_string(),
            profile: profile(),
            question_type: "general".to_string(),
            subcategory: None,
        };

        let prompt = render_turn_prompt(&turn);
        assert!(!prompt.contains("Siblings' Ages"));
        assert!(!prompt.contains("Specific Topic"));
    }
}
