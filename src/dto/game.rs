use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{format_system_time, validation::validate_display_name},
    error::ServiceError,
    state::{
        game::{GameSession, GameStatus, Player},
        registry::JoinableGame,
        story::{Choice, Scene},
    },
};

/// Payload used to create a new game.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    /// Story to play; the catalog default when omitted.
    #[serde(default)]
    pub story_id: Option<String>,
}

/// Identifier returned once a game has been created.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateGameResponse {
    /// Identifier of the new game.
    pub game_id: Uuid,
}

/// Payload used to join a game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinGameRequest {
    /// Display name for the joining guest.
    pub name: String,
}

impl Validate for JoinGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Identifiers returned after a successful join.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinGameResponse {
    /// The game that was joined.
    pub game_id: Uuid,
    /// Freshly generated identity of the joining player.
    pub player_id: Uuid,
}

/// Payload used to cast a vote.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// Voting player.
    pub player_id: Uuid,
    /// Choice of the current scene being voted for.
    pub choice_id: String,
}

/// Public projection of a player.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub name: String,
}

/// Public projection of a choice. The target scene stays server-side.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChoiceSummary {
    pub id: String,
    pub text: String,
}

/// Public projection of a scene and its choices.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SceneSummary {
    pub id: String,
    pub title: String,
    pub text: String,
    pub choices: Vec<ChoiceSummary>,
}

/// Session status as exposed on the wire.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatusDto {
    /// Roster is filling.
    Waiting,
    /// Voting rounds in progress.
    Playing,
    /// Story reached an ending.
    Finished,
}

/// Full view of a game session returned by the REST surface.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameView {
    pub id: Uuid,
    pub created_at: String,
    pub status: GameStatusDto,
    pub story_id: String,
    pub scene: SceneSummary,
    pub players: Vec<PlayerSummary>,
    /// Votes of the current round, keyed by player id.
    #[schema(value_type = Object)]
    pub votes: IndexMap<Uuid, String>,
    pub max_players: usize,
}

/// Summary of a session that still accepts players.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinableGameSummary {
    pub id: Uuid,
    pub created_at: String,
    pub player_count: usize,
    pub max_players: usize,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
        }
    }
}

impl From<&Choice> for ChoiceSummary {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id.clone(),
            text: choice.text.clone(),
        }
    }
}

impl From<&Scene> for SceneSummary {
    fn from(scene: &Scene) -> Self {
        Self {
            id: scene.id.clone(),
            title: scene.title.clone(),
            text: scene.text.clone(),
            choices: scene.choices.iter().map(Into::into).collect(),
        }
    }
}

impl From<GameStatus> for GameStatusDto {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Waiting => Self::Waiting,
            GameStatus::Playing => Self::Playing,
            GameStatus::Finished => Self::Finished,
        }
    }
}

impl TryFrom<&GameSession> for GameView {
    type Error = ServiceError;

    fn try_from(session: &GameSession) -> Result<Self, Self::Error> {
        let scene = session.current_scene()?.into();
        Ok(Self {
            id: session.id,
            created_at: format_system_time(session.created_at),
            status: session.status.into(),
            story_id: session.story.id.clone(),
            scene,
            players: session.players.values().map(Into::into).collect(),
            votes: session.votes.clone(),
            max_players: session.max_players,
        })
    }
}

impl From<JoinableGame> for JoinableGameSummary {
    fn from(game: JoinableGame) -> Self {
        Self {
            id: game.id,
            created_at: format_system_time(game.created_at),
            player_count: game.player_count,
            max_players: game.max_players,
        }
    }
}
