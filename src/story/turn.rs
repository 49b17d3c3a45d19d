//! One game turn: player input in, scene + choices + optional assets
//! out.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::prompt::image_prompt;
use super::scene;
use super::session::SessionRegistry;
use crate::r#gen::{Gateway, GenerateError, GenerationBackend};
use crate::openai::Message;

/// Which secondary asset a non-fatal failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Audio => write!(f, "audio"),
        }
    }
}

/// A secondary generation failure attached to an otherwise successful
/// turn.
#[derive(Debug)]
pub struct AssetFailure {
    pub kind: AssetKind,
    pub error: GenerateError,
}

/// Everything produced by one turn. Consumed once by the caller and
/// discarded; the transcript is the only state that outlives it.
#[derive(Debug)]
pub struct TurnResult {
    pub scene: String,
    pub choices: Vec<String>,
    pub image_url: Option<String>,
    pub audio: Option<PathBuf>,
    pub errors: Vec<AssetFailure>,
}

/// Failures that abort a turn before any scene is produced. Secondary
/// asset failures never end up here; they ride along on the result.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("failed to generate the story: {0}")]
    Generation(#[from] GenerateError),
}

/// Drives game turns against a session registry and a generation
/// gateway. The registry is owned by the caller; at most one in-flight
/// turn per session is the caller's contract, and the registry lock is
/// never held across a backend call so other sessions keep moving.
pub struct Orchestrator<B> {
    registry: Arc<RwLock<SessionRegistry>>,
    gateway: Gateway<B>,
    system_prompt: String,
}

impl<B: GenerationBackend> Orchestrator<B> {
    pub fn new(
        registry: Arc<RwLock<SessionRegistry>>,
        gateway: Gateway<B>,
        system_prompt: &str,
    ) -> Self {
        Self {
            registry,
            gateway,
            system_prompt: system_prompt.to_string(),
        }
    }

    /// Start a brand-new story for `session_id` from the player's
    /// initial prompt. An existing session under the same id is reset.
    pub async fn begin_turn(
        &self,
        session_id: &str,
        initial_prompt: &str,
    ) -> Result<TurnResult, TurnError> {
        if initial_prompt.trim().is_empty() {
            return Err(TurnError::EmptyInput("prompt"));
        }

        {
            let mut registry = self.registry.write().expect("Unable to write session registry");
            let transcript = registry.get_or_insert(session_id, &self.system_prompt);
            transcript.reset(&self.system_prompt);
            transcript.append_user(initial_prompt);
        }

        self.advance(session_id).await
    }

    /// Advance an existing story by one player choice.
    pub async fn continue_turn(
        &self,
        session_id: &str,
        choice: &str,
    ) -> Result<TurnResult, TurnError> {
        if choice.trim().is_empty() {
            return Err(TurnError::EmptyInput("choice"));
        }

        {
            let mut registry = self.registry.write().expect("Unable to write session registry");
            let transcript = registry
                .get_mut(session_id)
                .ok_or_else(|| TurnError::UnknownSession(session_id.to_string()))?;
            transcript.append_user(&format!("I choose to: {}", choice));
        }

        self.advance(session_id).await
    }

    /// Run the generation pipeline for whatever is in the transcript:
    /// text first (fatal on failure), then image and audio concurrently
    /// with their failures reported inline on the result.
    async fn advance(&self, session_id: &str) -> Result<TurnResult, TurnError> {
        // Snapshot the history so the lock is not held across the
        // backend call
        let history: Vec<Message> = {
            let registry = self.registry.read().expect("Unable to read session registry");
            let transcript = registry
                .get(session_id)
                .ok_or_else(|| TurnError::UnknownSession(session_id.to_string()))?;
            transcript.messages().to_vec()
        };

        tracing::info!("[{}] Generating story...", session_id);
        let raw = self.gateway.generate_text(&history).await?;

        if raw.trim().is_empty() {
            // Nothing to narrate, illustrate, or keep in the history
            tracing::warn!("[{}] Received empty response from the text backend", session_id);
            return Ok(TurnResult {
                scene: String::new(),
                choices: Vec::new(),
                image_url: None,
                audio: None,
                errors: Vec::new(),
            });
        }

        let parsed = scene::parse(&raw);
        tracing::info!(
            "[{}] Story generated: {} choice(s)",
            session_id,
            parsed.choices.len()
        );

        // The transcript keeps the full raw reply, not the parsed parts
        {
            let mut registry = self.registry.write().expect("Unable to write session registry");
            if let Some(transcript) = registry.get_mut(session_id) {
                transcript.append_assistant(&raw);
            }
        }

        let mut result = TurnResult {
            scene: parsed.scene,
            choices: parsed.choices,
            image_url: None,
            audio: None,
            errors: Vec::new(),
        };

        // Image and audio share no mutable state and both read the
        // same scene, so they run concurrently
        let prompt = image_prompt(&result.scene);
        let (image, audio) = tokio::join!(
            self.gateway.generate_image(&prompt),
            self.gateway.generate_audio(&result.scene),
        );

        match image {
            Ok(url) => result.image_url = url,
            Err(error) => {
                tracing::error!("[{}] Image generation failed: {}", session_id, error);
                result.errors.push(AssetFailure {
                    kind: AssetKind::Image,
                    error,
                });
            }
        }
        match audio {
            Ok(path) => result.audio = path,
            Err(error) => {
                tracing::error!("[{}] Audio generation failed: {}", session_id, error);
                result.errors.push(AssetFailure {
                    kind: AssetKind::Audio,
                    error,
                });
            }
        }

        Ok(result)
    }
}
