use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::ServiceError,
    state::{
        game::{GameSession, Player},
        story::Story,
    },
};

/// Handle to a session guarded by its own lock.
///
/// Every mutation of roster, votes, scene, or status happens under this lock,
/// so concurrent join/vote/progress calls on one session appear atomic while
/// unrelated sessions proceed in parallel.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Summary of a session that still accepts players.
#[derive(Debug, Clone)]
pub struct JoinableGame {
    /// Session identifier.
    pub id: Uuid,
    /// When the session was created.
    pub created_at: SystemTime,
    /// Current roster size.
    pub player_count: usize,
    /// Roster capacity.
    pub max_players: usize,
}

/// Owner of the session collection.
///
/// Insert/remove/list go through the sharded map so no single lock serializes
/// unrelated games; per-session state is guarded by each session's own mutex.
pub struct GameRegistry {
    games: DashMap<Uuid, SharedSession>,
    max_players: usize,
}

impl GameRegistry {
    /// Create an empty registry whose sessions cap their roster at `max_players`.
    pub fn new(max_players: usize) -> Self {
        Self {
            games: DashMap::new(),
            max_players,
        }
    }

    /// Allocate a fresh session for `story` and return its identifier.
    pub fn create_game(&self, story: Arc<Story>) -> Result<Uuid, ServiceError> {
        let id = Uuid::new_v4();
        let session = GameSession::new(id, story, self.max_players)?;
        self.games.insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Look up a session handle by identifier.
    pub fn game(&self, id: Uuid) -> Result<SharedSession, ServiceError> {
        self.games
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ServiceError::NotFound(format!("game `{id}` not found")))
    }

    /// Snapshot every session.
    ///
    /// Session handles are collected first so no session lock is awaited
    /// while a map shard is held.
    pub async fn list_games(&self) -> Vec<GameSession> {
        let handles = self.session_handles();
        let mut sessions = Vec::with_capacity(handles.len());
        for handle in handles {
            sessions.push(handle.lock().await.clone());
        }
        sessions
    }

    /// Summaries of the sessions that are still waiting for players.
    pub async fn list_joinable(&self) -> Vec<JoinableGame> {
        let mut joinable = Vec::new();
        for handle in self.session_handles() {
            let session = handle.lock().await;
            if session.is_joinable() {
                joinable.push(JoinableGame {
                    id: session.id,
                    created_at: session.created_at,
                    player_count: session.players.len(),
                    max_players: session.max_players,
                });
            }
        }
        joinable
    }

    /// Drop a session. No-op if the identifier is unknown.
    pub fn remove_game(&self, id: Uuid) {
        self.games.remove(&id);
    }

    /// Remove every session older than `ttl`, returning the removed ids.
    ///
    /// Candidates are snapshotted before any removal and each session lock is
    /// taken only long enough to read the (immutable) creation timestamp, so
    /// the sweep never blocks a join/vote on a live session and never holds a
    /// map shard while waiting on a session lock. A request already holding a
    /// handle to a swept session completes against the detached state.
    pub async fn sweep_expired(&self, now: SystemTime, ttl: Duration) -> Vec<Uuid> {
        let candidates: Vec<(Uuid, SharedSession)> = self
            .games
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut removed = Vec::new();
        for (id, handle) in candidates {
            let created_at = handle.lock().await.created_at;
            if created_at + ttl < now && self.games.remove(&id).is_some() {
                removed.push(id);
            }
        }
        removed
    }

    /// Add a player to a session, returning the updated session snapshot.
    pub async fn add_player_to(
        &self,
        game_id: Uuid,
        player: Player,
    ) -> Result<GameSession, ServiceError> {
        let handle = self.game(game_id)?;
        let mut session = handle.lock().await;
        session.add_player(player)?;
        Ok(session.clone())
    }

    fn session_handles(&self) -> Vec<SharedSession> {
        self.games
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::story::{Choice, Scene};

    fn two_scene_story() -> Arc<Story> {
        Arc::new(Story {
            id: "story-test".into(),
            title: "Test Story".into(),
            scenes: vec![
                Scene {
                    id: "scene-1".into(),
                    title: "Start".into(),
                    text: "It begins.".into(),
                    choices: vec![Choice {
                        id: "onward".into(),
                        text: "Onward".into(),
                        next_scene_id: Some("scene-2".into()),
                    }],
                },
                Scene {
                    id: "scene-2".into(),
                    title: "End".into(),
                    text: "It ends.".into(),
                    choices: vec![],
                },
            ],
        })
    }

    fn named_player(name: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn created_game_is_retrievable_and_starts_waiting() {
        let registry = GameRegistry::new(4);
        let id = registry.create_game(two_scene_story()).unwrap();

        let session = registry.game(id).unwrap();
        let session = session.lock().await;
        assert_eq!(session.id, id);
        assert_eq!(session.current_scene_id, "scene-1");
        assert!(session.is_joinable());
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let registry = GameRegistry::new(4);
        let err = registry.game(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_game_is_idempotent() {
        let registry = GameRegistry::new(4);
        let id = registry.create_game(two_scene_story()).unwrap();

        registry.remove_game(id);
        registry.remove_game(id);
        assert!(registry.game(id).is_err());
    }

    #[tokio::test]
    async fn join_until_full_drops_game_from_joinable_list() {
        let registry = GameRegistry::new(2);
        let id = registry.create_game(two_scene_story()).unwrap();
        assert_eq!(registry.list_joinable().await.len(), 1);

        registry.add_player_to(id, named_player("ada")).await.unwrap();
        let joinable = registry.list_joinable().await;
        assert_eq!(joinable.len(), 1);
        assert_eq!(joinable[0].player_count, 1);
        assert_eq!(joinable[0].max_players, 2);

        registry
            .add_player_to(id, named_player("grace"))
            .await
            .unwrap();
        assert!(registry.list_joinable().await.is_empty());

        let err = registry
            .add_player_to(id, named_player("third"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::GameFull));
    }

    #[tokio::test]
    async fn playing_game_is_not_joinable() {
        let registry = GameRegistry::new(4);
        let id = registry.create_game(two_scene_story()).unwrap();
        let snapshot = registry.add_player_to(id, named_player("ada")).await.unwrap();
        let player_id = *snapshot.players.keys().next().unwrap();

        {
            let handle = registry.game(id).unwrap();
            let mut session = handle.lock().await;
            session.cast_vote(player_id, "onward").unwrap();
        }

        assert!(registry.list_joinable().await.is_empty());
    }

    #[tokio::test]
    async fn join_on_missing_game_is_not_found() {
        let registry = GameRegistry::new(4);
        let err = registry
            .add_player_to(Uuid::new_v4(), named_player("ada"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let registry = GameRegistry::new(4);
        let ttl = Duration::from_secs(60 * 60 * 24);
        let now = SystemTime::now();

        let stale = registry.create_game(two_scene_story()).unwrap();
        let fresh = registry.create_game(two_scene_story()).unwrap();

        {
            let handle = registry.game(stale).unwrap();
            handle.lock().await.created_at = now - ttl - Duration::from_secs(1);
        }
        {
            let handle = registry.game(fresh).unwrap();
            handle.lock().await.created_at = now - Duration::from_secs(60);
        }

        let removed = registry.sweep_expired(now, ttl).await;
        assert_eq!(removed, vec![stale]);
        assert!(registry.game(stale).is_err());
        assert!(registry.game(fresh).is_ok());
    }
}
