//! Router for the game API

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use super::public::{self, GameError};
use crate::api::state::AppState;
use crate::story::TurnError;

type SharedState = Arc<AppState>;

/// Start a new adventure from the player's initial prompt
async fn start_game(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::StartRequest>,
) -> Result<impl IntoResponse, GameError> {
    if payload.session_id.trim().is_empty() {
        return Err(GameError(TurnError::EmptyInput("session_id")));
    }

    tracing::info!("Starting game for session {}", payload.session_id);
    let result = state
        .orchestrator
        .begin_turn(&payload.session_id, &payload.prompt)
        .await?;

    Ok(axum::Json(public::TurnResponse::from(result)))
}

/// Process the player's choice and generate the next scene
async fn make_choice(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::ChooseRequest>,
) -> Result<impl IntoResponse, GameError> {
    if payload.session_id.trim().is_empty() {
        return Err(GameError(TurnError::EmptyInput("session_id")));
    }

    tracing::info!(
        "Processing choice for session {}: '{}'",
        payload.session_id,
        payload.choice
    );
    let result = state
        .orchestrator
        .continue_turn(&payload.session_id, &payload.choice)
        .await?;

    Ok(axum::Json(public::TurnResponse::from(result)))
}

/// View the transcript for a session
async fn session_transcript(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let registry = state
        .registry
        .read()
        .map_err(|_| anyhow::anyhow!("Session registry lock poisoned"))?;

    let Some(transcript) = registry.get(&id) else {
        return Ok((StatusCode::NOT_FOUND, format!("Session {} not found", id)).into_response());
    };

    Ok(axum::Json(public::TranscriptResponse {
        transcript: transcript.messages().to_vec(),
    })
    .into_response())
}

/// Create the game router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/start", post(start_game))
        .route("/choose", post(make_choice))
        .route("/{id}/transcript", get(session_transcript))
}
