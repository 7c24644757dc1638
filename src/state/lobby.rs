use tokio::sync::RwLock;
use uuid::Uuid;

/// One message in the lobby chat log.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: Uuid,
    /// Message text.
    pub text: String,
}

/// One entry in the shared todo list.
#[derive(Debug, Clone)]
pub struct TodoItem {
    /// Entry identifier.
    pub id: Uuid,
    /// Entry text.
    pub text: String,
}

/// Append-only lobby logs shared by every guest.
pub struct LobbyState {
    chat: RwLock<Vec<ChatMessage>>,
    todos: RwLock<Vec<TodoItem>>,
}

impl Default for LobbyState {
    fn default() -> Self {
        Self::new()
    }
}

impl LobbyState {
    /// Create empty chat and todo logs.
    pub fn new() -> Self {
        Self {
            chat: RwLock::new(Vec::new()),
            todos: RwLock::new(Vec::new()),
        }
    }

    /// Append a chat message and return the stored entry.
    pub async fn append_chat(&self, text: String) -> ChatMessage {
        let message = ChatMessage {
            id: Uuid::new_v4(),
            text,
        };
        self.chat.write().await.push(message.clone());
        message
    }

    /// Append a todo entry and return the stored entry.
    pub async fn append_todo(&self, text: String) -> TodoItem {
        let item = TodoItem {
            id: Uuid::new_v4(),
            text,
        };
        self.todos.write().await.push(item.clone());
        item
    }

    /// Snapshot of the chat log in insertion order.
    pub async fn chat_log(&self) -> Vec<ChatMessage> {
        self.chat.read().await.clone()
    }

    /// Snapshot of the todo list in insertion order.
    pub async fn todo_list(&self) -> Vec<TodoItem> {
        self.todos.read().await.clone()
    }
}
