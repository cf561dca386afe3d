use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::login,
        crate::routes::threads::create_thread,
        crate::routes::threads::clear_thread,
        crate::routes::chat::chat,
        crate::routes::history::thread_history,
    ),
    components(schemas(
        crate::routes::auth::LoginRequest,
        crate::routes::auth::LoginResponse,
        crate::routes::threads::ThreadResponse,
        crate::routes::threads::ClearThreadRequest,
        crate::routes::chat::ChatRequest,
        crate::routes::chat::ChatResponse,
        crate::routes::history::HistoryEntry,
        crate::routes::history::HistoryResponse,
        crate::routes::health::HealthResponse,
    )),
    tags(
        (name = "auth", description = "Login and token issuance"),
        (name = "threads", description = "Thread creation and replacement"),
        (name = "chat", description = "Conversation turns"),
        (name = "history", description = "Ledger read-back"),
        (name = "health", description = "Liveness and dependency checks")
    )
)]
pub struct ApiDoc;
