//! In-memory registry of live story sessions.

use std::collections::HashMap;

use uuid::Uuid;

use super::transcript::Transcript;

/// Map from session id to transcript. The registry is owned by the
/// caller (the server keeps one for the life of the process) and shared
/// with the orchestrator; there is no eviction here, expiry is the
/// owner's concern.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Transcript>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session under a fresh id and return the id.
    pub fn create(&mut self, system_prompt: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Transcript::new(system_prompt));
        tracing::info!("Created new session: {}", id);
        id
    }

    /// Fetch the transcript for `id`, creating it when absent.
    pub fn get_or_insert(&mut self, id: &str, system_prompt: &str) -> &mut Transcript {
        self.sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::info!("Creating new session: {}", id);
            Transcript::new(system_prompt)
        })
    }

    pub fn get(&self, id: &str) -> Option<&Transcript> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Transcript> {
        self.sessions.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Reinitialize a session in place for a brand-new story. Returns
    /// false when the id is unknown.
    pub fn reset(&mut self, id: &str, system_prompt: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(transcript) => {
                transcript.reset(system_prompt);
                true
            }
            None => {
                tracing::warn!("Reset requested for unknown session: {}", id);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
