use std::env;

use crate::r#gen::ModelConfig;
use crate::story::prompt::SYSTEM_PROMPT;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub image_size: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub system_prompt: String,
    pub audio_dir: String,
    pub max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname =
            env::var("GM_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
        // An empty key means no backend is configured; the gateway
        // reports that per call instead of refusing to boot
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let text_model = env::var("GM_TEXT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let image_model = env::var("GM_IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());
        let image_size = env::var("GM_IMAGE_SIZE").unwrap_or_else(|_| "1024x1024".to_string());
        let tts_model = env::var("GM_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string());
        let tts_voice = env::var("GM_TTS_VOICE").unwrap_or_else(|_| "alloy".to_string());
        let system_prompt =
            env::var("GM_SYSTEM_PROMPT").unwrap_or_else(|_| SYSTEM_PROMPT.to_string());
        let audio_dir =
            env::var("GM_AUDIO_DIR").unwrap_or_else(|_| "generated_assets/audio".to_string());
        let max_attempts = env::var("GM_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        Self {
            openai_api_hostname,
            openai_api_key,
            text_model,
            image_model,
            image_size,
            tts_model,
            tts_voice,
            system_prompt,
            audio_dir,
            max_attempts,
        }
    }
}

impl AppConfig {
    /// Model bindings for the generation gateway.
    pub fn models(&self) -> ModelConfig {
        ModelConfig {
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            image_size: self.image_size.clone(),
            tts_model: self.tts_model.clone(),
            tts_voice: self.tts_voice.clone(),
        }
    }
}
