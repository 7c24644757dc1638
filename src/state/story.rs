/// Runtime representation of a branching story shared read-only by sessions.
#[derive(Debug, Clone)]
pub struct Story {
    /// Stable identifier for the story (e.g. `story-1`).
    pub id: String,
    /// Human readable story title.
    pub title: String,
    /// Scenes in declaration order; the first scene is the entry point.
    pub scenes: Vec<Scene>,
}

/// A single narrative beat with the choices offered to the players.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Stable identifier of the scene within its story.
    pub id: String,
    /// Short title displayed above the narrative text.
    pub title: String,
    /// Narrative text read to the players.
    pub text: String,
    /// Choices in declaration order. A scene without choices is terminal.
    pub choices: Vec<Choice>,
}

/// One selectable branch out of a scene.
#[derive(Debug, Clone)]
pub struct Choice {
    /// Stable identifier of the choice within its scene.
    pub id: String,
    /// Display text shown on the voting button.
    pub text: String,
    /// Scene the story moves to when this choice wins. `None` ends the story.
    pub next_scene_id: Option<String>,
}

impl Story {
    /// Look up a scene by identifier.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    /// Entry scene of the story.
    ///
    /// The catalog rejects stories without scenes at load time, so sessions
    /// can rely on this returning a scene for any story they reference.
    pub fn first_scene(&self) -> Option<&Scene> {
        self.scenes.first()
    }
}

impl Scene {
    /// A scene with no choices ends the story.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// Look up a choice of this scene by identifier.
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == id)
    }
}
