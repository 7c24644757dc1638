//! Immutable story catalog loaded once at process start.

pub mod models;

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use tracing::{info, warn};

use crate::{config::AppConfig, error::ServiceError, state::story::Story};

use self::models::StoryEntity;

/// Identifier of the story used when a create request names none.
pub const DEFAULT_STORY_ID: &str = "story-1";

/// Read-only registry of the stories available for play.
///
/// Stories are validated and frozen at load time; any number of sessions may
/// reference the same [`Story`] concurrently without synchronization.
pub struct StoryCatalog {
    stories: HashMap<String, Arc<Story>>,
    default_id: String,
}

impl StoryCatalog {
    /// Build the catalog from the configured story file, falling back to the
    /// built-in story when no file is configured or none of its entries load.
    pub fn load(config: &AppConfig) -> Self {
        if let Some(path) = config.stories_path() {
            if let Some(catalog) = Self::from_file(path) {
                return catalog;
            }
            warn!(
                path = %path.display(),
                "no usable stories in configured file; using the built-in story"
            );
        }
        Self::builtin()
    }

    /// Catalog containing only the story shipped with the binary.
    pub fn builtin() -> Self {
        let story: Story = builtin_story().into();
        debug_assert!(validate_story(&story).is_ok());

        let default_id = story.id.clone();
        let mut stories = HashMap::new();
        stories.insert(story.id.clone(), Arc::new(story));
        Self {
            stories,
            default_id,
        }
    }

    /// Look up a story by identifier.
    pub fn story(&self, id: &str) -> Result<Arc<Story>, ServiceError> {
        self.stories
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("story `{id}` not found")))
    }

    /// The story used when a game is created without an explicit story id.
    pub fn default_story(&self) -> Result<Arc<Story>, ServiceError> {
        self.story(&self.default_id)
    }

    fn from_file(path: &Path) -> Option<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read story file");
                return None;
            }
        };

        let entities = match serde_json::from_str::<Vec<StoryEntity>>(&contents) {
            Ok(entities) => entities,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to parse story file");
                return None;
            }
        };

        let catalog = Self::from_entities(entities);
        if let Some(catalog) = &catalog {
            info!(
                path = %path.display(),
                count = catalog.stories.len(),
                "loaded story catalog"
            );
        }
        catalog
    }

    /// Build a catalog from parsed entities, skipping entries that fail
    /// validation. The first valid story becomes the default.
    fn from_entities(entities: Vec<StoryEntity>) -> Option<Self> {
        let mut stories = HashMap::new();
        let mut default_id = None;

        for entity in entities {
            let story: Story = entity.into();
            if let Err(reason) = validate_story(&story) {
                warn!(story = %story.id, reason, "skipping invalid story");
                continue;
            }
            default_id.get_or_insert_with(|| story.id.clone());
            stories.insert(story.id.clone(), Arc::new(story));
        }

        Some(Self {
            stories,
            default_id: default_id?,
        })
    }
}

/// Check the referential integrity of a story: unique scene ids and choice
/// targets that resolve within the same story.
fn validate_story(story: &Story) -> Result<(), String> {
    if story.scenes.is_empty() {
        return Err("story has no scenes".into());
    }

    let mut scene_ids = std::collections::HashSet::new();
    for scene in &story.scenes {
        if !scene_ids.insert(scene.id.as_str()) {
            return Err(format!("duplicate scene id `{}`", scene.id));
        }
    }

    for scene in &story.scenes {
        for choice in &scene.choices {
            if let Some(target) = &choice.next_scene_id {
                if !scene_ids.contains(target.as_str()) {
                    return Err(format!(
                        "choice `{}` of scene `{}` points to unknown scene `{target}`",
                        choice.id, scene.id
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Story shipped with the binary so the server is playable out of the box.
fn builtin_story() -> StoryEntity {
    serde_json::from_str(BUILTIN_STORY_JSON).expect("built-in story must parse")
}

const BUILTIN_STORY_JSON: &str = r#"{
  "id": "story-1",
  "title": "The Forest of Forking Paths",
  "scenes": [
    {
      "id": "scene-1",
      "title": "A Fork in the Road",
      "text": "Dusk settles over the forest as the trail splits before you.",
      "choices": [
        { "id": "left", "text": "Take the left path", "next_scene_id": "scene-2" },
        { "id": "right", "text": "Take the right path", "next_scene_id": "scene-3" }
      ]
    },
    {
      "id": "scene-2",
      "title": "The Whispering Hollow",
      "text": "Voices drift between the trees, too soft to make out.",
      "choices": [
        { "id": "listen", "text": "Stop and listen", "next_scene_id": "scene-4" },
        { "id": "run", "text": "Run for the tree line", "next_scene_id": "scene-5" }
      ]
    },
    {
      "id": "scene-3",
      "title": "The Riverbank",
      "text": "A cold river blocks the way; the far shore glows faintly.",
      "choices": [
        { "id": "swim", "text": "Swim across", "next_scene_id": "scene-5" },
        { "id": "camp", "text": "Make camp for the night" }
      ]
    },
    {
      "id": "scene-4",
      "title": "The Hermit's Lantern",
      "text": "An old hermit raises a lantern and beckons you onward.",
      "choices": [
        { "id": "follow", "text": "Follow the lantern", "next_scene_id": "scene-5" }
      ]
    },
    {
      "id": "scene-5",
      "title": "The Clearing",
      "text": "The trees open onto a moonlit clearing. The journey ends here.",
      "choices": []
    }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_story_loads_and_resolves() {
        let catalog = StoryCatalog::builtin();
        let story = catalog.default_story().unwrap();
        assert_eq!(story.id, DEFAULT_STORY_ID);
        assert_eq!(story.first_scene().unwrap().id, "scene-1");
        // Terminal branch and terminal scene both present.
        assert!(story.scene("scene-5").unwrap().is_terminal());
        let camp = story.scene("scene-3").unwrap().choice("camp").unwrap();
        assert!(camp.next_scene_id.is_none());
    }

    #[test]
    fn unknown_story_is_not_found() {
        let catalog = StoryCatalog::builtin();
        let err = catalog.story("story-404").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn stories_with_dangling_targets_are_skipped() {
        let entities: Vec<StoryEntity> = serde_json::from_str(
            r#"[
                {
                  "id": "story-bad",
                  "title": "Broken",
                  "scenes": [
                    {
                      "id": "s1",
                      "title": "Start",
                      "text": "...",
                      "choices": [{ "id": "go", "text": "Go", "next_scene_id": "nowhere" }]
                    }
                  ]
                },
                {
                  "id": "story-good",
                  "title": "Fine",
                  "scenes": [{ "id": "s1", "title": "Only", "text": "...", "choices": [] }]
                }
            ]"#,
        )
        .unwrap();

        let catalog = StoryCatalog::from_entities(entities).unwrap();
        assert!(catalog.story("story-bad").is_err());
        assert!(catalog.story("story-good").is_ok());
        assert_eq!(catalog.default_story().unwrap().id, "story-good");
    }

    #[test]
    fn empty_story_set_yields_no_catalog() {
        assert!(StoryCatalog::from_entities(Vec::new()).is_none());
    }

    #[test]
    fn duplicate_scene_ids_are_rejected() {
        let entities: Vec<StoryEntity> = serde_json::from_str(
            r#"[
                {
                  "id": "story-dup",
                  "title": "Twice",
                  "scenes": [
                    { "id": "s1", "title": "One", "text": "...", "choices": [] },
                    { "id": "s1", "title": "Two", "text": "...", "choices": [] }
                  ]
                }
            ]"#,
        )
        .unwrap();

        assert!(StoryCatalog::from_entities(entities).is_none());
    }
}
