//! Public types for the game API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::openai::Message;
use crate::story::{TurnError, TurnResult};

#[derive(Deserialize)]
pub struct StartRequest {
    pub session_id: String,
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct ChooseRequest {
    pub session_id: String,
    pub choice: String,
}

/// One turn's outcome as rendered to the client. `error` carries
/// either the fatal failure (scene is null) or the joined non-fatal
/// asset failures (scene and choices still render).
#[derive(Serialize)]
pub struct TurnResponse {
    pub scene: Option<String>,
    pub choices: Vec<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub error: Option<String>,
}

impl From<TurnResult> for TurnResponse {
    fn from(result: TurnResult) -> Self {
        let audio_url = result
            .audio
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| format!("/audio/{}", name.to_string_lossy()));
        let error = if result.errors.is_empty() {
            None
        } else {
            Some(
                result
                    .errors
                    .iter()
                    .map(|failure| format!("{} error: {}", failure.kind, failure.error))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        Self {
            scene: Some(result.scene),
            choices: result.choices,
            image_url: result.image_url,
            audio_url,
            error,
        }
    }
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<Message>,
}

/// Maps turn failures onto the API: validation problems are the
/// caller's fault, a failed story generation is a turn-level failure.
pub struct GameError(pub TurnError);

impl From<TurnError> for GameError {
    fn from(err: TurnError) -> Self {
        Self(err)
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        match &self.0 {
            TurnError::EmptyInput(_) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "error": self.0.to_string() })),
            )
                .into_response(),
            TurnError::UnknownSession(_) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "error": "Invalid or expired session. Please refresh." })),
            )
                .into_response(),
            TurnError::Generation(err) => {
                let body = TurnResponse {
                    scene: None,
                    choices: Vec::new(),
                    image_url: None,
                    audio_url: None,
                    error: Some(format!("Failed to generate story: {}", err)),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
