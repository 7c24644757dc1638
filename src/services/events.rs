use axum::extract::ws::Message;
use indexmap::IndexMap;
use tracing::warn;

use crate::{
    dto::{
        game::{JoinableGameSummary, PlayerSummary, SceneSummary},
        sse::ServerEvent,
        ws::{GameFinishedPayload, SceneUpdatePayload, ServerMessage},
    },
    state::{
        SharedState,
        broker::{LOBBY_CHANNEL, game_channel},
        game::GameSession,
        lobby::{ChatMessage, TodoItem},
    },
};

/// Event name used on the lobby SSE stream for joinable-games snapshots.
const EVENT_JOINABLE_GAMES: &str = "games.joinable";

/// Broadcast the updated roster of a game on its own channel.
pub fn broadcast_roster_update(state: &SharedState, session: &GameSession) {
    let players: Vec<PlayerSummary> = session.players.values().map(Into::into).collect();
    publish(
        state,
        &game_channel(session.id),
        &ServerMessage::RosterUpdate(players),
    );
}

/// Broadcast the scene a game just progressed to, with a fresh empty tally.
pub fn broadcast_scene_update(state: &SharedState, session: &GameSession) {
    let scene: SceneSummary = match session.current_scene() {
        Ok(scene) => scene.into(),
        Err(err) => {
            warn!(game_id = %session.id, error = %err, "cannot broadcast scene update");
            return;
        }
    };
    publish(
        state,
        &game_channel(session.id),
        &ServerMessage::SceneUpdate(SceneUpdatePayload {
            scene,
            votes: IndexMap::new(),
        }),
    );
}

/// Broadcast that a game reached its ending.
pub fn broadcast_game_finished(state: &SharedState, session: &GameSession) {
    publish(
        state,
        &game_channel(session.id),
        &ServerMessage::GameFinished(GameFinishedPayload {
            scene_id: session.current_scene_id.clone(),
        }),
    );
}

/// Broadcast a lobby chat message on the shared channel.
pub fn broadcast_chat(state: &SharedState, message: ChatMessage) {
    publish(state, LOBBY_CHANNEL, &ServerMessage::Chat(message.into()));
}

/// Broadcast a todo entry on the shared channel.
pub fn broadcast_todo(state: &SharedState, item: TodoItem) {
    publish(state, LOBBY_CHANNEL, &ServerMessage::Todo(item.into()));
}

/// Push a fresh joinable-games snapshot onto the lobby SSE stream.
pub async fn broadcast_joinable_games(state: &SharedState) {
    if let Some(event) = joinable_games_event(state).await {
        state.lobby_sse().broadcast(event);
    }
}

/// Current joinable-games snapshot as an SSE event, for new subscribers.
pub async fn joinable_games_event(state: &SharedState) -> Option<ServerEvent> {
    let games: Vec<JoinableGameSummary> = state
        .registry()
        .list_joinable()
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    match ServerEvent::json(Some(EVENT_JOINABLE_GAMES.to_string()), &games) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(error = %err, "failed to serialize joinable games snapshot");
            None
        }
    }
}

fn publish(state: &SharedState, channel: &str, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(payload) => state.broker().publish(channel, Message::Text(payload.into())),
        Err(err) => warn!(channel, error = %err, "failed to serialize realtime payload"),
    }
}
