pub mod broker;
pub mod game;
pub mod lobby;
pub mod registry;
mod sse;
pub mod story;

use std::sync::Arc;

use crate::{
    catalog::StoryCatalog,
    config::AppConfig,
    state::{broker::ChannelBroker, lobby::LobbyState, registry::GameRegistry},
};

pub use self::sse::SseHub;

/// Cheaply clonable handle on the application state.
pub type SharedState = Arc<AppState>;

/// Capacity of the lobby SSE broadcast channel.
const LOBBY_SSE_CAPACITY: usize = 16;

/// Central application state: the story catalog, the session registry, the
/// realtime broker, and the lobby logs.
///
/// Constructed once at startup and passed by handle to every consumer; there
/// is no ambient global instance.
pub struct AppState {
    config: AppConfig,
    catalog: StoryCatalog,
    registry: GameRegistry,
    broker: ChannelBroker,
    lobby: LobbyState,
    lobby_sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, catalog: StoryCatalog) -> SharedState {
        let registry = GameRegistry::new(config.max_players());
        Arc::new(Self {
            config,
            catalog,
            registry,
            broker: ChannelBroker::new(),
            lobby: LobbyState::new(),
            lobby_sse: SseHub::new(LOBBY_SSE_CAPACITY),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read-only story catalog loaded at startup.
    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    /// Registry owning every game session.
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Fan-out broker for WebSocket channels.
    pub fn broker(&self) -> &ChannelBroker {
        &self.broker
    }

    /// Shared lobby chat/todo logs.
    pub fn lobby(&self) -> &LobbyState {
        &self.lobby
    }

    /// Broadcast hub used for the lobby SSE stream.
    pub fn lobby_sse(&self) -> &SseHub {
        &self.lobby_sse
    }
}
