use crate::{
    dto::lobby::{ChatMessageSummary, TodoItemSummary},
    error::ServiceError,
    services::events,
    state::SharedState,
};

/// Append a chat message to the lobby log and broadcast it.
pub async fn post_chat(
    state: &SharedState,
    text: String,
) -> Result<ChatMessageSummary, ServiceError> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ServiceError::InvalidInput(
            "chat message must not be blank".into(),
        ));
    }

    let message = state.lobby().append_chat(text).await;
    events::broadcast_chat(state, message.clone());
    Ok(message.into())
}

/// Append a todo entry to the shared list and broadcast it.
pub async fn post_todo(
    state: &SharedState,
    text: String,
) -> Result<TodoItemSummary, ServiceError> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ServiceError::InvalidInput(
            "todo entry must not be blank".into(),
        ));
    }

    let item = state.lobby().append_todo(text).await;
    events::broadcast_todo(state, item.clone());
    Ok(item.into())
}

/// Chat log in insertion order.
pub async fn chat_log(state: &SharedState) -> Vec<ChatMessageSummary> {
    state
        .lobby()
        .chat_log()
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Todo list in insertion order.
pub async fn todo_list(state: &SharedState) -> Vec<TodoItemSummary> {
    state
        .lobby()
        .todo_list()
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::StoryCatalog, config::AppConfig, state::AppState};

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default(), StoryCatalog::builtin())
    }

    #[tokio::test]
    async fn posted_messages_appear_in_the_log_in_order() {
        let state = test_state();
        post_chat(&state, "first".into()).await.unwrap();
        post_chat(&state, "  second  ".into()).await.unwrap();

        let log = chat_log(&state).await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].text, "first");
        assert_eq!(log[1].text, "second");
    }

    #[tokio::test]
    async fn blank_entries_are_rejected() {
        let state = test_state();
        assert!(matches!(
            post_chat(&state, "   ".into()).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
        assert!(matches!(
            post_todo(&state, "".into()).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
        assert!(chat_log(&state).await.is_empty());
        assert!(todo_list(&state).await.is_empty());
    }
}
