//! Error types for the radio core and its REST API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pmosource::ResolveError;
use serde::Serialize;
use utoipa::ToSchema;

/// Result type alias for radio operations
pub type Result<T> = std::result::Result<T, RadioError>;

/// Errors reported to API clients
#[derive(Debug, thiserror::Error)]
pub enum RadioError {
    /// No current track (empty playlist)
    #[error("No track is currently playing")]
    NotPlaying,

    /// The favorite slot is empty
    #[error("No favorite saved")]
    NoFavorite,

    /// The current or favorite track has no playable URL
    #[error("Audio unavailable for track {0}")]
    AudioUnavailable(String),

    /// The source could not produce a playable URL for a submission
    #[error("Could not resolve track: {0}")]
    Resolution(#[from] ResolveError),

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RadioError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RadioError::NotPlaying => "NOT_PLAYING",
            RadioError::NoFavorite => "NO_FAVORITE",
            RadioError::AudioUnavailable(_) => "AUDIO_UNAVAILABLE",
            RadioError::Resolution(_) => "RESOLUTION_FAILED",
            RadioError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RadioError::NotPlaying | RadioError::NoFavorite => StatusCode::NOT_FOUND,
            RadioError::AudioUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RadioError::Resolution(_) | RadioError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for RadioError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.code().to_string(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
