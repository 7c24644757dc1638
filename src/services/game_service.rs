use uuid::Uuid;

use crate::{
    dto::game::{
        CreateGameRequest, CreateGameResponse, GameView, JoinGameRequest, JoinGameResponse,
        JoinableGameSummary, VoteRequest,
    },
    error::ServiceError,
    services::events,
    state::{
        SharedState,
        game::{GameStatus, Player, Progress},
    },
};

/// Create a fresh game session for the requested story.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<CreateGameResponse, ServiceError> {
    let story = match request.story_id.as_deref() {
        Some(id) => state.catalog().story(id)?,
        None => state.catalog().default_story()?,
    };

    let game_id = state.registry().create_game(story)?;
    events::broadcast_joinable_games(state).await;
    Ok(CreateGameResponse { game_id })
}

/// Snapshot every session as a REST view.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameView>, ServiceError> {
    state
        .registry()
        .list_games()
        .await
        .iter()
        .map(GameView::try_from)
        .collect()
}

/// Summaries of the sessions that still accept players.
pub async fn list_joinable_games(state: &SharedState) -> Vec<JoinableGameSummary> {
    state
        .registry()
        .list_joinable()
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Current view of a single session.
pub async fn game_view(state: &SharedState, game_id: Uuid) -> Result<GameView, ServiceError> {
    let handle = state.registry().game(game_id)?;
    let session = handle.lock().await;
    GameView::try_from(&*session)
}

/// Add a guest to a session under a freshly generated player id.
///
/// A fresh id per join means the same guest can occupy several roster slots
/// by joining twice; that mirrors the upstream behavior this service keeps.
pub async fn join_game(
    state: &SharedState,
    game_id: Uuid,
    request: JoinGameRequest,
) -> Result<JoinGameResponse, ServiceError> {
    let player = Player {
        id: Uuid::new_v4(),
        name: request.name.trim().to_string(),
    };
    let player_id = player.id;

    let snapshot = state.registry().add_player_to(game_id, player).await?;
    events::broadcast_roster_update(state, &snapshot);
    events::broadcast_joinable_games(state).await;

    Ok(JoinGameResponse { game_id, player_id })
}

/// Explicitly drop a session ahead of its time-to-live. Idempotent.
pub async fn remove_game(state: &SharedState, game_id: Uuid) {
    state.registry().remove_game(game_id);
    events::broadcast_joinable_games(state).await;
}

/// Record a vote and progress the scene when the round is complete.
///
/// Progression is evaluated under the same session lock as the vote so the
/// tally cannot change between the two steps.
pub async fn cast_vote(
    state: &SharedState,
    game_id: Uuid,
    request: VoteRequest,
) -> Result<GameView, ServiceError> {
    let handle = state.registry().game(game_id)?;

    let (snapshot, progress, was_waiting) = {
        let mut session = handle.lock().await;
        let was_waiting = session.status == GameStatus::Waiting;
        session.cast_vote(request.player_id, &request.choice_id)?;
        let progress = session.try_progress()?;
        (session.clone(), progress, was_waiting)
    };

    match progress {
        Progress::Pending => {}
        Progress::Advanced => events::broadcast_scene_update(state, &snapshot),
        Progress::Finished => events::broadcast_game_finished(state, &snapshot),
    }
    if was_waiting {
        // The first vote moved the session out of the joinable list.
        events::broadcast_joinable_games(state).await;
    }

    GameView::try_from(&snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::StoryCatalog,
        config::AppConfig,
        dto::game::GameStatusDto,
        state::AppState,
    };

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default(), StoryCatalog::builtin())
    }

    async fn joined_player(state: &SharedState, game_id: Uuid, name: &str) -> Uuid {
        join_game(
            state,
            game_id,
            JoinGameRequest { name: name.into() },
        )
        .await
        .unwrap()
        .player_id
    }

    #[tokio::test]
    async fn create_defaults_to_the_builtin_story() {
        let state = test_state();
        let created = create_game(&state, CreateGameRequest::default()).await.unwrap();

        let view = game_view(&state, created.game_id).await.unwrap();
        assert_eq!(view.story_id, "story-1");
        assert_eq!(view.scene.id, "scene-1");
        assert_eq!(view.status, GameStatusDto::Waiting);
    }

    #[tokio::test]
    async fn create_with_unknown_story_fails() {
        let state = test_state();
        let err = create_game(
            &state,
            CreateGameRequest {
                story_id: Some("story-404".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn two_players_voting_the_same_choice_advance_the_scene() {
        let state = test_state();
        let game_id = create_game(&state, CreateGameRequest::default())
            .await
            .unwrap()
            .game_id;

        let p1 = joined_player(&state, game_id, "ada").await;
        let p2 = joined_player(&state, game_id, "grace").await;

        let view = cast_vote(
            &state,
            game_id,
            VoteRequest {
                player_id: p1,
                choice_id: "left".into(),
            },
        )
        .await
        .unwrap();
        // Round incomplete: still on the first scene, vote recorded.
        assert_eq!(view.scene.id, "scene-1");
        assert_eq!(view.votes.len(), 1);

        let view = cast_vote(
            &state,
            game_id,
            VoteRequest {
                player_id: p2,
                choice_id: "left".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(view.scene.id, "scene-2");
        assert!(view.votes.is_empty());
        assert_eq!(view.status, GameStatusDto::Playing);
    }

    #[tokio::test]
    async fn joining_a_full_game_fails_and_leaves_roster_unchanged() {
        let state = test_state();
        let game_id = create_game(&state, CreateGameRequest::default())
            .await
            .unwrap()
            .game_id;

        for i in 0..state.config().max_players() {
            joined_player(&state, game_id, &format!("player-{i}")).await;
        }

        let err = join_game(
            &state,
            game_id,
            JoinGameRequest {
                name: "late".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::GameFull));

        let view = game_view(&state, game_id).await.unwrap();
        assert_eq!(view.players.len(), state.config().max_players());
    }

    #[tokio::test]
    async fn same_guest_name_joins_twice_under_distinct_ids() {
        let state = test_state();
        let game_id = create_game(&state, CreateGameRequest::default())
            .await
            .unwrap()
            .game_id;

        let first = joined_player(&state, game_id, "ada").await;
        let second = joined_player(&state, game_id, "ada").await;
        assert_ne!(first, second);

        let view = game_view(&state, game_id).await.unwrap();
        assert_eq!(view.players.len(), 2);
    }

    #[tokio::test]
    async fn full_games_leave_the_joinable_list() {
        let state = test_state();
        let game_id = create_game(&state, CreateGameRequest::default())
            .await
            .unwrap()
            .game_id;
        assert_eq!(list_joinable_games(&state).await.len(), 1);

        for i in 0..state.config().max_players() {
            joined_player(&state, game_id, &format!("player-{i}")).await;
        }
        assert!(list_joinable_games(&state).await.is_empty());
    }

    #[tokio::test]
    async fn failed_vote_leaves_the_session_unchanged() {
        let state = test_state();
        let game_id = create_game(&state, CreateGameRequest::default())
            .await
            .unwrap()
            .game_id;
        let p1 = joined_player(&state, game_id, "ada").await;

        let err = cast_vote(
            &state,
            game_id,
            VoteRequest {
                player_id: p1,
                choice_id: "teleport".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::UnknownChoice(_)));

        let view = game_view(&state, game_id).await.unwrap();
        assert!(view.votes.is_empty());
        assert_eq!(view.status, GameStatusDto::Waiting);
    }

    #[tokio::test]
    async fn lone_player_can_walk_a_story_to_its_ending() {
        let state = test_state();
        let game_id = create_game(&state, CreateGameRequest::default())
            .await
            .unwrap()
            .game_id;
        let p1 = joined_player(&state, game_id, "ada").await;

        let view = cast_vote(
            &state,
            game_id,
            VoteRequest {
                player_id: p1,
                choice_id: "right".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(view.scene.id, "scene-3");

        // `camp` is a terminal branch: the game finishes on the same scene.
        let view = cast_vote(
            &state,
            game_id,
            VoteRequest {
                player_id: p1,
                choice_id: "camp".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(view.status, GameStatusDto::Finished);
        assert_eq!(view.scene.id, "scene-3");

        let err = cast_vote(
            &state,
            game_id,
            VoteRequest {
                player_id: p1,
                choice_id: "swim".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }
}
