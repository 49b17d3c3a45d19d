use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::r#gen::BackendError;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Turn a non-success response into a classified `BackendError`,
/// carrying whatever the backend said in the body.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Request the next chat completion for a transcript from an OpenAI
/// compatible API and return the assistant's reply text.
pub async fn completion(
    client: &reqwest::Client,
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<String, BackendError> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "temperature": 0.7,
        "max_tokens": 500,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(120))
        .json(&payload)
        .send()
        .await?;
    let response = error_for_status(response).await?;
    let body: Value = response.json().await?;

    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            BackendError::Malformed(format!("completion response missing content: {}", body))
        })?;
    Ok(content.to_string())
}

/// Request a single generated image and return its hosted URL.
pub async fn image_generation(
    client: &reqwest::Client,
    prompt: &str,
    api_hostname: &str,
    api_key: &str,
    model: &str,
    size: &str,
) -> Result<String, BackendError> {
    let payload = json!({
        "model": model,
        "prompt": prompt,
        "n": 1,
        "size": size,
        "response_format": "url",
    });
    let url = format!("{}/v1/images/generations", api_hostname.trim_end_matches("/"));
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(120))
        .json(&payload)
        .send()
        .await?;
    let response = error_for_status(response).await?;
    let body: Value = response.json().await?;

    // A 2xx with no URL in it still isn't an image
    let image_url = body["data"][0]["url"].as_str().ok_or_else(|| {
        BackendError::Malformed("image generation succeeded but no URL was returned".to_string())
    })?;
    Ok(image_url.to_string())
}

/// Request spoken audio for a piece of text and return the raw bytes.
pub async fn speech(
    client: &reqwest::Client,
    input: &str,
    api_hostname: &str,
    api_key: &str,
    model: &str,
    voice: &str,
) -> Result<Vec<u8>, BackendError> {
    let payload = json!({
        "model": model,
        "voice": voice,
        "input": input,
    });
    let url = format!("{}/v1/audio/speech", api_hostname.trim_end_matches("/"));
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(120))
        .json(&payload)
        .send()
        .await?;
    let response = error_for_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
