use std::sync::Arc;
use std::time::Duration;

use sprout_assistant::AssistantClient;
use sprout_auth::{LoginProvider, TokenSigner};
use sprout_persist::PersistClient;

use crate::config::Config;
use crate::orchestrator::{TurnConfig, TurnOrchestrator};

/// Shared application state passed to all handlers
///
/// All collaborators are explicitly constructed at startup and injected
/// here; handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<PersistClient>,
    pub assistant: Arc<dyn AssistantClient>,
    pub provider: Arc<dyn LoginProvider>,
    pub token_signer: Arc<TokenSigner>,
    pub orchestrator: Arc<TurnOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: PersistClient,
        assistant: Arc<dyn AssistantClient>,
        provider: Arc<dyn LoginProvider>,
    ) -> Self {
        let persist = Arc::new(persist);
        let token_signer = Arc::new(TokenSigner::new(
            &config.jwt_secret,
            config.auth.token_ttl_days,
        ));

        // Without both credentials the orchestrator rejects each turn
        // before touching the service or the ledger
        let assistant_id = (!config.openai_api_key.is_empty()
            && !config.openai_assistant_id.is_empty())
        .then(|| config.openai_assistant_id.clone());

        let orchestrator = Arc::new(TurnOrchestrator::new(
            assistant.clone(),
            persist.clone(),
            TurnConfig {
                assistant_id,
                poll_interval: Duration::from_millis(config.assistant.poll_interval_ms),
                run_deadline: Duration::from_secs(config.assistant.run_deadline_secs),
            },
        ));

        Self {
            config: Arc::new(config),
            persist,
            assistant,
            provider,
            token_signer,
            orchestrator,
        }
    }
}
