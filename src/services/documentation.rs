use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Campfire Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::lobby_stream,
        crate::routes::websocket::ws_handler,
        crate::routes::game::create_game,
        crate::routes::game::list_games,
        crate::routes::game::list_joinable_games,
        crate::routes::game::get_game,
        crate::routes::game::delete_game,
        crate::routes::game::join_game,
        crate::routes::game::cast_vote,
        crate::routes::lobby::chat_log,
        crate::routes::lobby::post_chat,
        crate::routes::lobby::todo_list,
        crate::routes::lobby::post_todo,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::CreateGameResponse,
            crate::dto::game::JoinGameRequest,
            crate::dto::game::JoinGameResponse,
            crate::dto::game::VoteRequest,
            crate::dto::game::GameView,
            crate::dto::game::JoinableGameSummary,
            crate::dto::lobby::PostChatRequest,
            crate::dto::lobby::PostTodoRequest,
            crate::dto::lobby::ChatMessageSummary,
            crate::dto::lobby::TodoItemSummary,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Game session lifecycle and voting"),
        (name = "lobby", description = "Shared chat log and todo list"),
    )
)]
pub struct ApiDoc;
