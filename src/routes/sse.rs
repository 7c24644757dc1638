use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::{events, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/lobby",
    responses((status = 200, description = "Lobby SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream joinable-game snapshots to lobby frontends.
pub async fn lobby_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_lobby(&state);
    info!("new lobby SSE connection");
    let initial = events::joinable_games_event(&state).await;
    sse_service::to_sse_stream(receiver, initial)
}

/// Configure the SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/lobby", get(lobby_stream))
}
