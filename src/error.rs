use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested story, game, or resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A player with this id is already in the roster.
    #[error("player `{0}` is already in the game")]
    DuplicatePlayer(Uuid),
    /// The roster is at capacity.
    #[error("game is full")]
    GameFull,
    /// Vote cast by a player that is not in the roster.
    #[error("player `{0}` is not in the game")]
    UnknownPlayer(Uuid),
    /// Vote references a choice the current scene does not offer.
    #[error("choice `{0}` is not available in the current scene")]
    UnknownChoice(String),
    /// Story content references a scene that does not exist.
    #[error("invalid story state: {0}")]
    InvalidStoryState(String),
    /// Operation cannot be performed in the current session status.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::UnknownPlayer(player_id) => {
                AppError::NotFound(format!("player `{player_id}` is not in the game"))
            }
            ServiceError::DuplicatePlayer(player_id) => {
                AppError::Conflict(format!("player `{player_id}` is already in the game"))
            }
            ServiceError::GameFull => AppError::Conflict("game is full".into()),
            ServiceError::UnknownChoice(choice_id) => AppError::BadRequest(format!(
                "choice `{choice_id}` is not available in the current scene"
            )),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidStoryState(message) => AppError::Internal(message),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {err}"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
