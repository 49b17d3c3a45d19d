//! Binds the generation gateway to an OpenAI compatible API.

use async_trait::async_trait;

use super::core;
use super::core::Message;
use crate::r#gen::{BackendError, GenerationBackend};

/// Connection details for one OpenAI compatible API, reused across all
/// three capabilities. Cloning shares the underlying HTTP client.
#[derive(Clone)]
pub struct OpenAiBackend {
    api_hostname: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn chat_completion(
        &self,
        messages: &[Message],
        model: &str,
    ) -> Result<String, BackendError> {
        core::completion(
            &self.client,
            messages,
            &self.api_hostname,
            &self.api_key,
            model,
        )
        .await
    }

    async fn image(&self, prompt: &str, model: &str, size: &str) -> Result<String, BackendError> {
        core::image_generation(
            &self.client,
            prompt,
            &self.api_hostname,
            &self.api_key,
            model,
            size,
        )
        .await
    }

    async fn speech(&self, text: &str, model: &str, voice: &str) -> Result<Vec<u8>, BackendError> {
        core::speech(
            &self.client,
            text,
            &self.api_hostname,
            &self.api_key,
            model,
            voice,
        )
        .await
    }
}
