//! Controller for chat message and session endpoints.

use crate::params::api_key::MessageResponse;
use crate::params::chat::{ChatRequest, ChatResponse, CreateSessionParams, ListSessionsParams};
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::chat::{ChatMessage, ChatSession, DEFAULT_SESSION_LIMIT};
use domain::Id;

use log::*;

/// POST send a chat message and get a response
///
/// When no session id is supplied a new session is created for the exchange
/// and its id is returned in the response.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Message processed", body = ChatResponse),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn message(
    State(app_state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Chat message for session: {:?}", request.session_id);

    let reply = app_state
        .chat_service()
        .process_message(&request.message, request.session_id, request.context)
        .await?;

    Ok(Json(ChatResponse::from(reply)))
}

/// POST create a new chat session
#[utoipa::path(
    post,
    path = "/chat/sessions",
    request_body = CreateSessionParams,
    responses(
        (status = 200, description = "Successfully created a new chat session", body = ChatSession),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn create_session(
    State(app_state): State<AppState>,
    Json(params): Json<CreateSessionParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new chat session: {:?}", params.title);

    let session = app_state
        .chat_service()
        .create_session(params.title, params.metadata)
        .await;

    Ok(Json(session))
}

/// GET all chat sessions, most recently updated first
#[utoipa::path(
    get,
    path = "/chat/sessions",
    params(ListSessionsParams),
    responses(
        (status = 200, description = "Successfully retrieved chat sessions", body = [ChatSession]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<ListSessionsParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all chat sessions: {params:?}");

    let sessions = app_state
        .chat_service()
        .list_sessions(
            params.limit.unwrap_or(DEFAULT_SESSION_LIMIT),
            params.offset.unwrap_or(0),
        )
        .await;

    Ok(Json(sessions))
}

/// GET a chat session by its id
#[utoipa::path(
    get,
    path = "/chat/sessions/{id}",
    params(
        ("id" = String, Path, description = "Chat session id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a chat session by its id", body = ChatSession),
        (status = 404, description = "Session not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET chat session by id: {id}");

    let session = app_state.chat_service().get_session(id).await?;

    Ok(Json(session))
}

/// DELETE a chat session and its messages
#[utoipa::path(
    delete,
    path = "/chat/sessions/{id}",
    params(
        ("id" = String, Path, description = "Chat session id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a chat session", body = MessageResponse),
        (status = 404, description = "Session not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE chat session by id: {id}");

    let deleted = app_state.chat_service().delete_session(id).await;

    if deleted {
        Ok(Json(MessageResponse {
            message: "Session deleted successfully".to_string(),
        })
        .into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, "NOT FOUND").into_response())
    }
}

/// GET all messages from a chat session
///
/// Unknown session ids yield an empty list rather than an error.
#[utoipa::path(
    get,
    path = "/chat/sessions/{id}/messages",
    params(
        ("id" = String, Path, description = "Chat session id whose messages to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved session messages", body = [ChatMessage]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn messages(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET messages for chat session: {id}");

    let messages = app_state.chat_service().get_messages(id).await;

    Ok(Json(messages))
}
