use std::{sync::Arc, time::SystemTime};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    error::ServiceError,
    state::story::{Scene, Story},
};

/// Guest identity tracked inside a single game session.
#[derive(Debug, Clone)]
pub struct Player {
    /// Opaque identifier, freshly generated on join.
    pub id: Uuid,
    /// Display name chosen by the guest.
    pub name: String,
}

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Roster is filling; the session shows up in the joinable list.
    Waiting,
    /// At least one vote has been accepted; rounds are in progress.
    Playing,
    /// The story reached a terminal branch; no further votes are accepted.
    Finished,
}

/// Outcome of a progression attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Votes are still outstanding; nothing changed.
    Pending,
    /// The winning choice moved the story to a new scene.
    Advanced,
    /// The winning branch ended the story.
    Finished,
}

/// One playthrough of a story by a fixed set of players.
///
/// All mutation goes through the named operations below; the registry wraps
/// each session in its own lock so they appear atomic to callers.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Primary key of the session.
    pub id: Uuid,
    /// Creation timestamp, used for expiry sweeping.
    pub created_at: SystemTime,
    /// Story being played, shared read-only with other sessions.
    pub story: Arc<Story>,
    /// Identifier of the scene currently displayed to the players.
    pub current_scene_id: String,
    /// Roster in join order, keyed by player id.
    pub players: IndexMap<Uuid, Player>,
    /// Votes of the current round, keyed by player id.
    pub votes: IndexMap<Uuid, String>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Roster capacity.
    pub max_players: usize,
}

impl GameSession {
    /// Build a fresh session positioned on the story's entry scene.
    pub fn new(id: Uuid, story: Arc<Story>, max_players: usize) -> Result<Self, ServiceError> {
        let first_scene_id = story
            .first_scene()
            .map(|scene| scene.id.clone())
            .ok_or_else(|| {
                ServiceError::InvalidStoryState(format!("story `{}` has no scenes", story.id))
            })?;

        Ok(Self {
            id,
            created_at: SystemTime::now(),
            story,
            current_scene_id: first_scene_id,
            players: IndexMap::new(),
            votes: IndexMap::new(),
            status: GameStatus::Waiting,
            max_players,
        })
    }

    /// Resolve the scene the session currently points at.
    pub fn current_scene(&self) -> Result<&Scene, ServiceError> {
        self.story.scene(&self.current_scene_id).ok_or_else(|| {
            ServiceError::InvalidStoryState(format!(
                "current scene `{}` is missing from story `{}`",
                self.current_scene_id, self.story.id
            ))
        })
    }

    /// Whether the session still accepts new players.
    pub fn is_joinable(&self) -> bool {
        self.status == GameStatus::Waiting && self.players.len() < self.max_players
    }

    /// Insert a player into the roster.
    pub fn add_player(&mut self, player: Player) -> Result<(), ServiceError> {
        if self.players.contains_key(&player.id) {
            return Err(ServiceError::DuplicatePlayer(player.id));
        }
        if self.players.len() >= self.max_players {
            return Err(ServiceError::GameFull);
        }
        self.players.insert(player.id, player);
        Ok(())
    }

    /// Record (or overwrite) a player's vote for the current round.
    ///
    /// The first accepted vote moves the session from `Waiting` to `Playing`.
    /// Voting never advances the scene by itself; call [`Self::try_progress`]
    /// afterwards while still holding the session lock.
    pub fn cast_vote(&mut self, player_id: Uuid, choice_id: &str) -> Result<(), ServiceError> {
        if self.status == GameStatus::Finished {
            return Err(ServiceError::InvalidState(
                "game is finished; votes are no longer accepted".into(),
            ));
        }
        if !self.players.contains_key(&player_id) {
            return Err(ServiceError::UnknownPlayer(player_id));
        }

        let known_choice = self.current_scene()?.choice(choice_id).is_some();
        if !known_choice {
            return Err(ServiceError::UnknownChoice(choice_id.to_string()));
        }

        self.votes.insert(player_id, choice_id.to_string());
        if self.status == GameStatus::Waiting {
            self.status = GameStatus::Playing;
        }
        Ok(())
    }

    /// Advance the scene once every roster member has voted.
    ///
    /// Returns [`Progress::Pending`] without touching any state while votes
    /// are outstanding (an empty roster never progresses). On progression the
    /// vote map is cleared; a winning choice without a target, or a target
    /// scene without choices, finishes the game.
    pub fn try_progress(&mut self) -> Result<Progress, ServiceError> {
        if self.players.is_empty() || self.votes.len() < self.players.len() {
            return Ok(Progress::Pending);
        }

        let story = Arc::clone(&self.story);
        let scene = story.scene(&self.current_scene_id).ok_or_else(|| {
            ServiceError::InvalidStoryState(format!(
                "current scene `{}` is missing from story `{}`",
                self.current_scene_id, story.id
            ))
        })?;

        let choice_order: Vec<&str> = scene.choices.iter().map(|c| c.id.as_str()).collect();
        // Votes are validated against the scene on cast, so a winner resolves.
        let winner_id = tally(&self.votes, &choice_order).ok_or_else(|| {
            ServiceError::InvalidStoryState(format!(
                "no vote matched the choices of scene `{}`",
                scene.id
            ))
        })?;
        let winner = scene.choice(winner_id).ok_or_else(|| {
            ServiceError::InvalidStoryState(format!(
                "winning choice `{winner_id}` is missing from scene `{}`",
                scene.id
            ))
        })?;

        match winner.next_scene_id.as_deref() {
            None => {
                self.votes.clear();
                self.status = GameStatus::Finished;
                Ok(Progress::Finished)
            }
            Some(target) => {
                let next = story.scene(target).ok_or_else(|| {
                    ServiceError::InvalidStoryState(format!(
                        "choice `{}` points to unknown scene `{target}`",
                        winner.id
                    ))
                })?;

                self.current_scene_id = next.id.clone();
                self.votes.clear();
                if next.is_terminal() {
                    self.status = GameStatus::Finished;
                    Ok(Progress::Finished)
                } else {
                    Ok(Progress::Advanced)
                }
            }
        }
    }
}

/// Pick the winning choice from a round of votes.
///
/// The choice with the strictly highest number of votes wins; exact ties go
/// to the earliest entry in `choice_order` (the scene's declaration order).
/// Returns `None` when no vote matches any listed choice.
pub fn tally<'a>(votes: &IndexMap<Uuid, String>, choice_order: &[&'a str]) -> Option<&'a str> {
    let mut winner = None;
    let mut max_count = 0;

    for &choice_id in choice_order {
        let count = votes.values().filter(|vote| *vote == choice_id).count();
        if count > max_count {
            max_count = count;
            winner = Some(choice_id);
        }
    }

    winner
}
