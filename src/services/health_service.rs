use crate::dto::health::HealthResponse;

/// Report the current health of the backend.
///
/// All state lives in-process, so the service is healthy whenever it answers.
pub fn health_status() -> HealthResponse {
    HealthResponse::ok()
}
