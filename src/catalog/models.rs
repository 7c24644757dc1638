use serde::Deserialize;

use crate::state::story::{Choice, Scene, Story};

/// On-disk representation of a story inside the story definition file.
#[derive(Debug, Deserialize)]
pub struct StoryEntity {
    /// Stable story identifier.
    pub id: String,
    /// Story title.
    pub title: String,
    /// Scenes in declaration order.
    pub scenes: Vec<SceneEntity>,
}

/// On-disk representation of a scene.
#[derive(Debug, Deserialize)]
pub struct SceneEntity {
    /// Scene identifier, unique within the story.
    pub id: String,
    /// Scene title.
    pub title: String,
    /// Narrative text.
    pub text: String,
    /// Choices in declaration order; omitted for terminal scenes.
    #[serde(default)]
    pub choices: Vec<ChoiceEntity>,
}

/// On-disk representation of a choice.
#[derive(Debug, Deserialize)]
pub struct ChoiceEntity {
    /// Choice identifier, unique within its scene.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Target scene; omitted when the choice ends the story.
    #[serde(default)]
    pub next_scene_id: Option<String>,
}

impl From<ChoiceEntity> for Choice {
    fn from(value: ChoiceEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            next_scene_id: value.next_scene_id,
        }
    }
}

impl From<SceneEntity> for Scene {
    fn from(value: SceneEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            text: value.text,
            choices: value.choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<StoryEntity> for Story {
    fn from(value: StoryEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            scenes: value.scenes.into_iter().map(Into::into).collect(),
        }
    }
}
