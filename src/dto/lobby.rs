use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::validate_lobby_text,
    state::lobby::{ChatMessage, TodoItem},
};

/// Payload used to post a lobby chat message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PostChatRequest {
    /// Message text.
    pub text: String,
}

impl Validate for PostChatRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_text_field(&self.text)
    }
}

/// Payload used to append a todo entry.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PostTodoRequest {
    /// Entry text.
    pub text: String,
}

impl Validate for PostTodoRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_text_field(&self.text)
    }
}

fn validate_text_field(text: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_lobby_text(text) {
        errors.add("text", e);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Public projection of a chat message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatMessageSummary {
    pub id: Uuid,
    pub text: String,
}

/// Public projection of a todo entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TodoItemSummary {
    pub id: Uuid,
    pub text: String,
}

impl From<ChatMessage> for ChatMessageSummary {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            text: message.text,
        }
    }
}

impl From<TodoItem> for TodoItemSummary {
    fn from(item: TodoItem) -> Self {
        Self {
            id: item.id,
            text: item.text,
        }
    }
}
