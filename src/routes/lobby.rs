use axum::{Json, Router, extract::State, routing::get};
use validator::Validate;

use crate::{
    dto::lobby::{ChatMessageSummary, PostChatRequest, PostTodoRequest, TodoItemSummary},
    error::AppError,
    services::lobby_service,
    state::SharedState,
};

/// Routes for the shared lobby chat log and todo list.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/lobby/chat", get(chat_log).post(post_chat))
        .route("/lobby/todos", get(todo_list).post(post_todo))
}

/// Read the lobby chat log.
#[utoipa::path(
    get,
    path = "/lobby/chat",
    tag = "lobby",
    responses((status = 200, description = "Chat log", body = [ChatMessageSummary]))
)]
pub async fn chat_log(State(state): State<SharedState>) -> Json<Vec<ChatMessageSummary>> {
    Json(lobby_service::chat_log(&state).await)
}

/// Post a chat message and broadcast it on the lobby channel.
#[utoipa::path(
    post,
    path = "/lobby/chat",
    tag = "lobby",
    request_body = PostChatRequest,
    responses((status = 200, description = "Stored message", body = ChatMessageSummary))
)]
pub async fn post_chat(
    State(state): State<SharedState>,
    Json(payload): Json<PostChatRequest>,
) -> Result<Json<ChatMessageSummary>, AppError> {
    payload.validate()?;
    let message = lobby_service::post_chat(&state, payload.text).await?;
    Ok(Json(message))
}

/// Read the shared todo list.
#[utoipa::path(
    get,
    path = "/lobby/todos",
    tag = "lobby",
    responses((status = 200, description = "Todo list", body = [TodoItemSummary]))
)]
pub async fn todo_list(State(state): State<SharedState>) -> Json<Vec<TodoItemSummary>> {
    Json(lobby_service::todo_list(&state).await)
}

/// Append a todo entry and broadcast it on the lobby channel.
#[utoipa::path(
    post,
    path = "/lobby/todos",
    tag = "lobby",
    request_body = PostTodoRequest,
    responses((status = 200, description = "Stored entry", body = TodoItemSummary))
)]
pub async fn post_todo(
    State(state): State<SharedState>,
    Json(payload): Json<PostTodoRequest>,
) -> Result<Json<TodoItemSummary>, AppError> {
    payload.validate()?;
    let item = lobby_service::post_todo(&state, payload.text).await?;
    Ok(Json(item))
}
