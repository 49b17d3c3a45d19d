//! Test utilities for integration tests
use std::path::Path;
use std::sync::{Arc, RwLock};

use axum::Router;
use tempfile::TempDir;

use gamemaster::api::AppState;
use gamemaster::api::app;
use gamemaster::core::AppConfig;
use gamemaster::r#gen::Gateway;
use gamemaster::openai::OpenAiBackend;
use gamemaster::story::{Orchestrator, SessionRegistry};

/// Build a test application wired to the given backend hostname
/// (normally a mockito server) with audio artifacts written under a
/// temporary directory owned by the caller.
///
/// The retry bound is 1 so failure tests hit each mock exactly once.
pub fn test_app(api_hostname: &str, audio_dir: &TempDir) -> Router {
    let config = AppConfig {
        openai_api_hostname: api_hostname.to_string(),
        openai_api_key: "test-api-key".to_string(),
        text_model: "gpt-4o-mini".to_string(),
        image_model: "dall-e-3".to_string(),
        image_size: "1024x1024".to_string(),
        tts_model: "tts-1".to_string(),
        tts_voice: "alloy".to_string(),
        system_prompt: "You are a test dungeon master.".to_string(),
        audio_dir: audio_dir.path().display().to_string(),
        max_attempts: 1,
    };

    let backend = OpenAiBackend::new(&config.openai_api_hostname, &config.openai_api_key);
    let gateway = Gateway::new(
        Some(backend),
        config.models(),
        config.max_attempts,
        Path::new(&config.audio_dir),
    );
    let registry = Arc::new(RwLock::new(SessionRegistry::new()));
    let orchestrator = Orchestrator::new(Arc::clone(&registry), gateway, &config.system_prompt);

    let app_state = AppState::new(orchestrator, registry, config);
    app(Arc::new(app_state))
}

pub async fn body_to_string(body: axum::body::Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
