//! Uniform front door for text, image, and audio generation.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::backend::{BackendError, GenerationBackend};
use super::retry::{GenerateError, retry_transient};
use crate::openai::Message;

/// Model bindings for the three generation capabilities. All
/// identifiers are opaque configuration strings passed through to the
/// backend unchanged.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub text_model: String,
    pub image_model: String,
    pub image_size: String,
    pub tts_model: String,
    pub tts_voice: String,
}

/// Dispatches generation requests to the configured backend with a
/// shared bounded-retry policy. A gateway without a backend binding
/// answers every request with `GenerateError::Unavailable`.
pub struct Gateway<B> {
    backend: Option<B>,
    models: ModelConfig,
    max_attempts: u32,
    audio_dir: PathBuf,
}

impl<B: GenerationBackend> Gateway<B> {
    pub fn new(backend: Option<B>, models: ModelConfig, max_attempts: u32, audio_dir: &Path) -> Self {
        Self {
            backend,
            models,
            max_attempts,
            audio_dir: audio_dir.to_path_buf(),
        }
    }

    fn backend(&self) -> Result<&B, GenerateError> {
        self.backend.as_ref().ok_or(GenerateError::Unavailable)
    }

    /// Generate the next story reply for a transcript.
    pub async fn generate_text(&self, history: &[Message]) -> Result<String, GenerateError> {
        let backend = self.backend()?;
        retry_transient(self.max_attempts, BackendError::is_transient, || {
            backend.chat_completion(history, &self.models.text_model)
        })
        .await
    }

    /// Generate an illustration and return its hosted URL. An empty
    /// prompt is a no-op, not an error.
    pub async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenerateError> {
        let backend = self.backend()?;
        if prompt.trim().is_empty() {
            return Ok(None);
        }
        let url = retry_transient(self.max_attempts, BackendError::is_transient, || {
            backend.image(prompt, &self.models.image_model, &self.models.image_size)
        })
        .await?;
        Ok(Some(url))
    }

    /// Generate spoken narration, persist it under the audio directory,
    /// and return the file path. Empty text is a no-op, not an error.
    /// On success the file exists and its name is unique.
    pub async fn generate_audio(&self, text: &str) -> Result<Option<PathBuf>, GenerateError> {
        let backend = self.backend()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let bytes = retry_transient(self.max_attempts, BackendError::is_transient, || {
            backend.speech(text, &self.models.tts_model, &self.models.tts_voice)
        })
        .await?;

        tokio::fs::create_dir_all(&self.audio_dir).await?;
        let path = self.audio_dir.join(format!("narration-{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("Audio narration saved to {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    fn models() -> ModelConfig {
        ModelConfig {
            text_model: "test-text".to_string(),
            image_model: "test-image".to_string(),
            image_size: "1024x1024".to_string(),
            tts_model: "test-tts".to_string(),
            tts_voice: "test-voice".to_string(),
        }
    }

    /// Backend stub that fails transiently a fixed number of times
    /// before succeeding, counting every call.
    struct FlakyBackend {
        failures: usize,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GenerationBackend for FlakyBackend {
        async fn chat_completion(
            &self,
            _messages: &[Message],
            _model: &str,
        ) -> Result<String, BackendError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(BackendError::Status {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok("a reply".to_string())
            }
        }

        async fn image(
            &self,
            _prompt: &str,
            _model: &str,
            _size: &str,
        ) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("https://img.example.com/1.png".to_string())
        }

        async fn speech(
            &self,
            _text: &str,
            _model: &str,
            _voice: &str,
        ) -> Result<Vec<u8>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(b"mp3-bytes".to_vec())
        }
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let gateway: Gateway<FlakyBackend> = Gateway::new(None, models(), 3, dir.path());

        let result = gateway.generate_text(&[]).await;
        assert!(matches!(result, Err(GenerateError::Unavailable)));

        let result = gateway.generate_image("a cave").await;
        assert!(matches!(result, Err(GenerateError::Unavailable)));

        let result = gateway.generate_audio("a cave").await;
        assert!(matches!(result, Err(GenerateError::Unavailable)));
    }

    #[tokio::test]
    async fn test_text_retries_through_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = FlakyBackend {
            failures: 2,
            calls: Arc::clone(&calls),
        };
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(Some(backend), models(), 3, dir.path());

        let text = gateway.generate_text(&[]).await.unwrap();
        assert_eq!(text, "a reply");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_text_exhausts_the_retry_bound() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = FlakyBackend {
            failures: usize::MAX,
            calls: Arc::clone(&calls),
        };
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(Some(backend), models(), 3, dir.path());

        let result = gateway.generate_text(&[]).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(GenerateError::Exhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_a_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = FlakyBackend {
            failures: 0,
            calls: Arc::clone(&calls),
        };
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(Some(backend), models(), 3, dir.path());

        assert!(gateway.generate_image("").await.unwrap().is_none());
        assert!(gateway.generate_audio("  \n").await.unwrap().is_none());
        // Neither no-op reached the backend
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_audio_persists_a_unique_artifact() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = FlakyBackend {
            failures: 0,
            calls: Arc::clone(&calls),
        };
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(Some(backend), models(), 3, dir.path());

        let first = gateway.generate_audio("You enter a cave.").await.unwrap().unwrap();
        let second = gateway.generate_audio("You enter a cave.").await.unwrap().unwrap();

        assert!(first.exists());
        assert!(second.exists());
        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"mp3-bytes");
    }
}
