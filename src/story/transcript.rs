//! Role-tagged message history for one story session.

use crate::openai::{Message, Role};

use super::prompt::SYSTEM_PROMPT;

/// Ordered, append-only message history. The first entry is always the
/// single system message carrying the ruleset; it is never removed or
/// reordered, and the sequence is only ever extended one message at a
/// time.
pub struct Transcript(Vec<Message>);

impl Transcript {
    /// Start a fresh transcript with the given ruleset. An empty
    /// prompt falls back to the built-in ruleset so the leading system
    /// message invariant always holds.
    pub fn new(system_prompt: &str) -> Self {
        let prompt = if system_prompt.trim().is_empty() {
            SYSTEM_PROMPT
        } else {
            system_prompt
        };
        Self(vec![Message::new(Role::System, prompt)])
    }

    /// Append the player's input. Empty content is ignored with a
    /// warning. Returns the resulting length.
    pub fn append_user(&mut self, content: &str) -> usize {
        self.append(Role::User, content)
    }

    /// Append the backend's reply. Empty content is ignored with a
    /// warning. Returns the resulting length.
    pub fn append_assistant(&mut self, content: &str) -> usize {
        self.append(Role::Assistant, content)
    }

    fn append(&mut self, role: Role, content: &str) -> usize {
        if content.trim().is_empty() {
            tracing::warn!("Ignoring empty {:?} message", role);
            return self.0.len();
        }
        self.0.push(Message::new(role, content));
        self.0.len()
    }

    /// Read-only view of the full history, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Discard everything and reinitialize for a brand-new story.
    pub fn reset(&mut self, system_prompt: &str) {
        *self = Transcript::new(system_prompt);
    }
}
