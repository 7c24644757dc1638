use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{
    game::{PlayerSummary, SceneSummary},
    lobby::{ChatMessageSummary, TodoItemSummary},
};

/// Messages accepted from realtime WebSocket clients.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Subscribe the connection to a named channel.
    Subscribe {
        /// Channel to join (e.g. a game id).
        channel: String,
    },
    /// Drop one subscription, or every subscription when `channel` is omitted.
    Unsubscribe {
        /// Channel to leave; `None` leaves all of them.
        #[serde(default)]
        channel: Option<String>,
    },
    /// Post a chat message to the lobby.
    Chat {
        /// Message text.
        data: String,
    },
    /// Append an entry to the shared todo list.
    Todo {
        /// Entry text.
        data: String,
    },
    /// Any message tag this server does not understand.
    #[serde(other)]
    Unknown,
}

/// Messages fanned out to subscribed connections.
///
/// Serializes as `{"type": <tag>, "data": <payload>}` with kebab-case tags;
/// the tag set is closed so consumers can match exhaustively.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// The roster of a game changed.
    RosterUpdate(Vec<PlayerSummary>),
    /// A game progressed to a new scene; the vote tally restarts empty.
    SceneUpdate(SceneUpdatePayload),
    /// A game reached an ending.
    GameFinished(GameFinishedPayload),
    /// A chat message was posted to the lobby.
    Chat(ChatMessageSummary),
    /// A todo entry was appended to the shared list.
    Todo(TodoItemSummary),
}

/// Payload of [`ServerMessage::SceneUpdate`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SceneUpdatePayload {
    /// The scene now displayed to the players.
    pub scene: SceneSummary,
    /// Vote tally for the new round, always empty.
    #[schema(value_type = Object)]
    pub votes: IndexMap<Uuid, String>,
}

/// Payload of [`ServerMessage::GameFinished`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameFinishedPayload {
    /// Identifier of the final scene.
    pub scene_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn server_message_wire_shape_is_stable() {
        let message = ServerMessage::RosterUpdate(vec![PlayerSummary {
            id: Uuid::nil(),
            name: "ada".into(),
        }]);
        let value: Value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "roster-update");
        assert_eq!(value["data"][0]["name"], "ada");

        let message = ServerMessage::SceneUpdate(SceneUpdatePayload {
            scene: SceneSummary {
                id: "scene-2".into(),
                title: "The Old Bridge".into(),
                text: "A rope bridge sways ahead.".into(),
                choices: vec![],
            },
            votes: IndexMap::new(),
        });
        let value: Value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "scene-update");
        assert_eq!(value["data"]["scene"]["id"], "scene-2");
        assert_eq!(value["data"]["votes"], json!({}));

        let message = ServerMessage::GameFinished(GameFinishedPayload {
            scene_id: "scene-5".into(),
        });
        let value: Value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "game-finished");
        assert_eq!(value["data"]["scene_id"], "scene-5");
    }

    #[test]
    fn client_message_parses_known_tags() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type": "subscribe", "channel": "lobby"}"#).unwrap();
        assert!(matches!(message, ClientMessage::Subscribe { channel } if channel == "lobby"));

        let message: ClientMessage =
            serde_json::from_str(r#"{"type": "unsubscribe"}"#).unwrap();
        assert!(matches!(message, ClientMessage::Unsubscribe { channel: None }));

        let message: ClientMessage =
            serde_json::from_str(r#"{"type": "chat", "data": "hello"}"#).unwrap();
        assert!(matches!(message, ClientMessage::Chat { data } if data == "hello"));
    }

    #[test]
    fn client_message_tolerates_unknown_tags() {
        let message: ClientMessage = serde_json::from_str(r#"{"type": "dance"}"#).unwrap();
        assert!(matches!(message, ClientMessage::Unknown));
    }
}
