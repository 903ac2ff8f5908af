use crate::controller::{api_key_controller, chat_controller, health_check_controller};
use crate::{params, AppState};
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "MCP Chat API"
        ),
        paths(
            api_key_controller::create_or_update,
            api_key_controller::index,
            api_key_controller::read,
            api_key_controller::update,
            api_key_controller::delete,
            chat_controller::message,
            chat_controller::create_session,
            chat_controller::index,
            chat_controller::read,
            chat_controller::delete,
            chat_controller::messages,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::api_keys::Model,
                domain::chat::ChatMessage,
                domain::chat::ChatSession,
                domain::chat::MessageRole,
                params::api_key::CreateParams,
                params::api_key::UpdateParams,
                params::api_key::ApiKeyResponse,
                params::api_key::ApiKeyListResponse,
                params::api_key::MessageResponse,
                params::chat::ChatRequest,
                params::chat::ChatResponse,
                params::chat::CreateSessionParams,
            )
        ),
        tags(
            (name = "mcp_chat", description = "MCP Chat & API Key Vault API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(api_key_routes(app_state.clone()))
        .merge(chat_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn api_key_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api-keys", post(api_key_controller::create_or_update))
        .route("/api-keys", get(api_key_controller::index))
        .route("/api-keys/:name", get(api_key_controller::read))
        .route("/api-keys/:name", patch(api_key_controller::update))
        .route("/api-keys/:name", delete(api_key_controller::delete))
        .with_state(app_state)
}

fn chat_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_controller::message))
        .route("/chat/sessions", post(chat_controller::create_session))
        .route("/chat/sessions", get(chat_controller::index))
        .route("/chat/sessions/:id", get(chat_controller::read))
        .route("/chat/sessions/:id", delete(chat_controller::delete))
        .route(
            "/chat/sessions/:id/messages",
            get(chat_controller::messages),
        )
        .with_state(app_state)
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
