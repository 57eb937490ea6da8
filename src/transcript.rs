//! Conversation history replayed to the model on every call.

use crate::types::{Message, Role};

/// The ordered conversation sent to the remote model.
///
/// The first message is always the system prompt given at construction.  The
/// API only appends user and assistant messages, so the system message can be
/// neither removed nor duplicated, and nothing is ever truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript holding only `system_prompt`.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Appends a user message.
    pub fn push_user(&mut self, content: impl Into<String>) -> &[Message] {
        self.messages.push(Message::user(content));
        &self.messages
    }

    /// Appends an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> &[Message] {
        self.messages.push(Message::assistant(content));
        &self.messages
    }

    /// The full conversation, in order, exactly as it is sent to the model.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// The system prompt this transcript was created with.
    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// The most recent message.
    pub fn last(&self) -> &Message {
        // never empty: index 0 holds the system message
        &self.messages[self.messages.len() - 1]
    }

    /// Number of messages, including the system message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages with the given role.
    pub fn count(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}
