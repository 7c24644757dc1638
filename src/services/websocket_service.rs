use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::ClientMessage,
    services::lobby_service,
    state::{SharedState, broker::LOBBY_CHANNEL},
};

/// Handle the full lifecycle of one realtime WebSocket connection.
///
/// The connection is registered with the broker under a fresh id and starts
/// out subscribed to the lobby channel; game channels are joined on request.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut outbound_rx = state.broker().register(connection_id);

    // Dedicated writer task keeps broadcasts flowing even while we await
    // inbound frames.
    let writer_task: JoinHandle<()> = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    state.broker().subscribe(connection_id, LOBBY_CHANNEL);
    info!(id = %connection_id, "realtime connection opened");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(inbound) => handle_client_message(&state, connection_id, inbound).await,
                Err(err) => {
                    warn!(id = %connection_id, error = %err, "failed to parse client message");
                }
            },
            Ok(Message::Ping(payload)) => {
                state.broker().send_to(connection_id, Message::Pong(payload));
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(id = %connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.broker().remove_connection(connection_id);
    info!(id = %connection_id, "realtime connection closed");

    // The broker dropped the sender, so the writer drains and winds down.
    let _ = writer_task.await;
}

/// Apply one inbound message to the broker or the lobby logs.
async fn handle_client_message(state: &SharedState, connection_id: Uuid, message: ClientMessage) {
    match message {
        ClientMessage::Subscribe { channel } => {
            state.broker().subscribe(connection_id, &channel);
        }
        ClientMessage::Unsubscribe { channel } => {
            state.broker().unsubscribe(connection_id, channel.as_deref());
        }
        ClientMessage::Chat { data } => {
            if let Err(err) = lobby_service::post_chat(state, data).await {
                warn!(id = %connection_id, error = %err, "rejected chat message");
            }
        }
        ClientMessage::Todo { data } => {
            if let Err(err) = lobby_service::post_todo(state, data).await {
                warn!(id = %connection_id, error = %err, "rejected todo entry");
            }
        }
        ClientMessage::Unknown => {
            warn!(id = %connection_id, "ignoring message with unknown type");
        }
    }
}
