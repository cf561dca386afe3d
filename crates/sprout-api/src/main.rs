use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sprout_api::{
    config::Config,
    docs::ApiDoc,
    middleware::logging,
    routes::{auth, chat, health, history, threads},
    state::AppState,
};
use sprout_assistant::OpenAIAssistantClient;
use sprout_auth::WeChatLoginProvider;
use sprout_persist::PersistClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Sprout API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize assistant client
    let assistant: Arc<dyn sprout_assistant::AssistantClient> =
        Arc::new(OpenAIAssistantClient::new(config.openai_api_key.clone())?);
    if config.openai_assistant_id.is_empty() {
        tracing::warn!("OPENAI_ASSISTANT_ID not set; chat turns will be rejected");
    }

    // Initialize login provider client
    let provider: Arc<dyn sprout_auth::LoginProvider> = Arc::new(WeChatLoginProvider::new(
        config.wechat_app_id.clone(),
        config.wechat_app_secret.clone(),
    ));

    // Initialize persistence client
    tracing::info!("Connecting to MongoDB");
    let persist = PersistClient::connect(&config.mongodb_uri, &config.mongodb.database).await?;
    persist.ensure_indexes().await?;

    tracing::info!("MongoDB connected");

    // Create application state
    let state = Arc::new(AppState::new(config, persist, assistant, provider));

    // Build router
    let app = build_router(state.clone());

    // Start server
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .route("/api/auth/login", post(auth::login))
        // Threads
        .route("/api/thread", post(threads::create_thread))
        .route("/api/clear", post(threads::clear_thread))
        // Chat
        .route("/api/chat", post(chat::chat))
        // History
        .route("/api/history/:thread_id", get(history::thread_history));

    // Build full router with middleware
    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging::log_request))
        // Must outlast the orchestrator's 30s run deadline
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(60)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            for origin in &config.cors.origins {
                if let Ok(parsed_origin) = origin.parse::<axum::http::HeaderValue>() {
                    cors = cors.allow_origin(parsed_origin);
                }
            }
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
