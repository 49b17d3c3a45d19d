//! The capability seam between the gateway and whichever service
//! actually produces text, images, and speech.

use async_trait::async_trait;
use thiserror::Error;

use crate::openai::Message;

/// A provider of the three generation capabilities. Implementations are
/// expected to be cheap to call repeatedly; the retry policy lives in
/// the gateway, not here.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce the next reply for a chat-style transcript.
    async fn chat_completion(&self, messages: &[Message], model: &str)
    -> Result<String, BackendError>;

    /// Produce an image for a prompt and return a hosted URL.
    async fn image(&self, prompt: &str, model: &str, size: &str) -> Result<String, BackendError>;

    /// Produce spoken audio bytes for a piece of text.
    async fn speech(&self, text: &str, model: &str, voice: &str) -> Result<Vec<u8>, BackendError>;
}

/// A single failed backend call, classified for the retry policy.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed: connection failures, timeouts,
    /// protocol errors.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The backend answered 2xx but the payload was not in the
    /// expected shape.
    #[error("backend response was malformed: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Rate limits, server-side failures, and transport errors are
    /// worth an immediate retry. Auth and malformed-request statuses
    /// will fail the same way again, as will an unparseable payload.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Transport(_) => true,
            BackendError::Status { status, .. } => *status == 429 || *status >= 500,
            BackendError::Malformed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_transient() {
        let err = BackendError::Status {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_server_errors_are_transient() {
        for status in [500, 502, 503] {
            let err = BackendError::Status {
                status,
                message: String::new(),
            };
            assert!(err.is_transient(), "expected {} to be transient", status);
        }
    }

    #[test]
    fn test_client_errors_are_terminal() {
        for status in [400, 401, 403, 404] {
            let err = BackendError::Status {
                status,
                message: String::new(),
            };
            assert!(!err.is_transient(), "expected {} to be terminal", status);
        }
    }

    #[test]
    fn test_malformed_is_terminal() {
        let err = BackendError::Malformed("missing content".to_string());
        assert!(!err.is_transient());
    }
}
