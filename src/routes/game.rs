use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::{
        CreateGameRequest, CreateGameResponse, GameView, JoinGameRequest, JoinGameResponse,
        JoinableGameSummary, VoteRequest,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes exposing the game session surface.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/joinable", get(list_joinable_games))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/vote", post(cast_vote))
}

/// Create a fresh game session.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = CreateGameResponse),
        (status = 404, description = "Unknown story")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let response = game_service::create_game(&state, payload).await?;
    Ok(Json(response))
}

/// List every game session.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses((status = 200, description = "All games", body = [GameView]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameView>>, AppError> {
    let games = game_service::list_games(&state).await?;
    Ok(Json(games))
}

/// List the games that still accept players.
#[utoipa::path(
    get,
    path = "/games/joinable",
    tag = "games",
    responses((status = 200, description = "Joinable games", body = [JoinableGameSummary]))
)]
pub async fn list_joinable_games(
    State(state): State<SharedState>,
) -> Json<Vec<JoinableGameSummary>> {
    Json(game_service::list_joinable_games(&state).await)
}

/// Current state of one game session.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game state", body = GameView),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameView>, AppError> {
    let view = game_service::game_view(&state, id).await?;
    Ok(Json(view))
}

/// Remove a game session. Succeeds whether or not the game exists.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses((status = 204, description = "Game removed"))
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> axum::http::StatusCode {
    game_service::remove_game(&state, id).await;
    axum::http::StatusCode::NO_CONTENT
}

/// Join a game under a fresh player identity.
#[utoipa::path(
    post,
    path = "/games/{id}/join",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = JoinGameRequest,
    responses(
        (status = 200, description = "Joined", body = JoinGameResponse),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game is full")
    )
)]
pub async fn join_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, AppError> {
    payload.validate()?;
    let response = game_service::join_game(&state, id, payload).await?;
    Ok(Json(response))
}

/// Cast a vote for a choice of the current scene.
#[utoipa::path(
    post,
    path = "/games/{id}/vote",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Updated game state", body = GameView),
        (status = 400, description = "Unknown choice"),
        (status = 404, description = "Unknown game or player"),
        (status = 409, description = "Game already finished")
    )
)]
pub async fn cast_vote(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<GameView>, AppError> {
    let view = game_service::cast_vote(&state, id, payload).await?;
    Ok(Json(view))
}
