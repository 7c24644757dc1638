/// OpenAPI documentation generation.
pub mod documentation;
/// Realtime event construction and broadcasting.
pub mod events;
/// Core game orchestration over the registry and sessions.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Lobby chat and todo log handling.
pub mod lobby_service;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
