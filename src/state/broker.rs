use std::collections::HashSet;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Name of the shared channel every connection joins on open.
pub const LOBBY_CHANNEL: &str = "lobby";

/// Channel carrying updates for one specific game.
///
/// Keyed by the game id so game-state traffic never leaks to plain lobby
/// subscribers.
pub fn game_channel(game_id: Uuid) -> String {
    game_id.to_string()
}

/// Outbound side of a registered connection.
struct ClientConnection {
    tx: mpsc::UnboundedSender<Message>,
}

/// Fan-out hub relating connections to named channels.
///
/// The broker never inspects payloads; it moves pre-serialized WebSocket
/// messages onto each subscriber's outbound queue. Delivery is best-effort:
/// a closed or missing connection is skipped silently, and `publish` never
/// blocks the caller. Messages queued to one connection preserve publish
/// order (one unbounded queue per connection).
pub struct ChannelBroker {
    connections: DashMap<Uuid, ClientConnection>,
    channels: DashMap<String, HashSet<Uuid>>,
}

impl ChannelBroker {
    /// Create a broker with no connections or subscriptions.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            channels: DashMap::new(),
        }
    }

    /// Register a connection and hand back the receiving end of its queue.
    ///
    /// The caller (the socket's writer task) owns the receiver; the broker
    /// keeps the sender until [`Self::remove_connection`].
    pub fn register(&self, connection_id: Uuid) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections
            .insert(connection_id, ClientConnection { tx });
        rx
    }

    /// Subscribe a connection to a channel. Idempotent.
    pub fn subscribe(&self, connection_id: Uuid, channel: &str) {
        self.channels
            .entry(channel.to_string())
            .or_default()
            .insert(connection_id);
    }

    /// Drop one subscription, or every subscription of the connection when
    /// `channel` is `None` (used on disconnect).
    pub fn unsubscribe(&self, connection_id: Uuid, channel: Option<&str>) {
        match channel {
            Some(name) => {
                if let Some(mut subscribers) = self.channels.get_mut(name) {
                    subscribers.remove(&connection_id);
                }
                self.channels.remove_if(name, |_, subs| subs.is_empty());
            }
            None => self.unsubscribe_all(connection_id),
        }
    }

    /// Deliver `message` to every connection subscribed to `channel`.
    pub fn publish(&self, channel: &str, message: Message) {
        let Some(subscribers) = self.channels.get(channel) else {
            return;
        };
        // Snapshot ids so no shard lock is held while touching connections.
        let ids: Vec<Uuid> = subscribers.iter().copied().collect();
        drop(subscribers);

        for id in ids {
            if let Some(connection) = self.connections.get(&id) {
                // A closed receiver means the socket is going away; teardown
                // will remove the registration.
                let _ = connection.tx.send(message.clone());
            }
        }
    }

    /// Queue a message for one specific connection, regardless of channels.
    ///
    /// Used for connection-scoped traffic such as pong replies. Best-effort
    /// like [`Self::publish`].
    pub fn send_to(&self, connection_id: Uuid, message: Message) {
        if let Some(connection) = self.connections.get(&connection_id) {
            let _ = connection.tx.send(message);
        }
    }

    /// Forget a connection entirely: unsubscribe everywhere and drop its queue.
    pub fn remove_connection(&self, connection_id: Uuid) {
        self.connections.remove(&connection_id);
        self.unsubscribe_all(connection_id);
    }

    fn unsubscribe_all(&self, connection_id: Uuid) {
        self.channels.retain(|_, subscribers| {
            subscribers.remove(&connection_id);
            !subscribers.is_empty()
        });
    }
}

impl Default for ChannelBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> Message {
        Message::Text(content.to_string().into())
    }

    fn recv_text(rx: &mut mpsc::UnboundedReceiver<Message>) -> String {
        match rx.try_recv().expect("expected a queued message") {
            Message::Text(payload) => payload.to_string(),
            other => panic!("expected text message, got {other:?}"),
        }
    }

    #[test]
    fn publish_reaches_only_channel_subscribers() {
        let broker = ChannelBroker::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = broker.register(a);
        let mut rx_b = broker.register(b);

        broker.subscribe(a, LOBBY_CHANNEL);
        broker.subscribe(b, "other");
        broker.publish(LOBBY_CHANNEL, text("hello"));

        assert_eq!(recv_text(&mut rx_a), "hello");
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn subscribe_is_idempotent() {
        let broker = ChannelBroker::new();
        let id = Uuid::new_v4();
        let mut rx = broker.register(id);

        broker.subscribe(id, LOBBY_CHANNEL);
        broker.subscribe(id, LOBBY_CHANNEL);
        broker.publish(LOBBY_CHANNEL, text("once"));

        assert_eq!(recv_text(&mut rx), "once");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unsubscribed_connection_stops_receiving() {
        let broker = ChannelBroker::new();
        let id = Uuid::new_v4();
        let mut rx = broker.register(id);

        broker.subscribe(id, LOBBY_CHANNEL);
        broker.unsubscribe(id, Some(LOBBY_CHANNEL));
        broker.publish(LOBBY_CHANNEL, text("gone"));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unsubscribe_without_channel_clears_every_subscription() {
        let broker = ChannelBroker::new();
        let id = Uuid::new_v4();
        let mut rx = broker.register(id);

        broker.subscribe(id, LOBBY_CHANNEL);
        broker.subscribe(id, "games");
        broker.unsubscribe(id, None);
        broker.publish(LOBBY_CHANNEL, text("a"));
        broker.publish("games", text("b"));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delivery_is_fifo_per_connection_across_channels() {
        let broker = ChannelBroker::new();
        let id = Uuid::new_v4();
        let mut rx = broker.register(id);

        broker.subscribe(id, LOBBY_CHANNEL);
        broker.subscribe(id, "games");
        broker.publish(LOBBY_CHANNEL, text("first"));
        broker.publish("games", text("second"));
        broker.publish(LOBBY_CHANNEL, text("third"));

        assert_eq!(recv_text(&mut rx), "first");
        assert_eq!(recv_text(&mut rx), "second");
        assert_eq!(recv_text(&mut rx), "third");
    }

    #[test]
    fn removed_connection_is_skipped_silently() {
        let broker = ChannelBroker::new();
        let gone = Uuid::new_v4();
        let stays = Uuid::new_v4();
        let _rx_gone = broker.register(gone);
        let mut rx_stays = broker.register(stays);

        broker.subscribe(gone, LOBBY_CHANNEL);
        broker.subscribe(stays, LOBBY_CHANNEL);
        broker.remove_connection(gone);
        broker.publish(LOBBY_CHANNEL, text("still here"));

        assert_eq!(recv_text(&mut rx_stays), "still here");
    }

    #[test]
    fn send_to_targets_a_single_connection() {
        let broker = ChannelBroker::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = broker.register(a);
        let mut rx_b = broker.register(b);

        broker.send_to(a, text("direct"));
        broker.send_to(Uuid::new_v4(), text("nobody"));

        assert_eq!(recv_text(&mut rx_a), "direct");
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn dead_receiver_does_not_fail_publish() {
        let broker = ChannelBroker::new();
        let id = Uuid::new_v4();
        let rx = broker.register(id);
        broker.subscribe(id, LOBBY_CHANNEL);

        drop(rx);
        broker.publish(LOBBY_CHANNEL, text("dropped"));
    }
}
