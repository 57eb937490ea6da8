use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Request body for the `chat/completions` endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model identifier, passed through verbatim.
    pub model: String,

    /// The full conversation, in order.
    pub messages: Vec<Message>,
}

impl ChatCompletionRequest {
    /// Create a new request for `model` over `messages`.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }
}

/// Response body from the `chat/completions` endpoint.
///
/// Only the fields the client reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Response identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// The model that produced the response.
    #[serde(default)]
    pub model: Option<String>,

    /// Candidate completions.
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,

    /// Token accounting, when the server reports it.
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

/// One candidate completion.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatCompletionChoice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    pub message: ChoiceMessage,

    /// Why generation stopped, e.g. `stop` or `length`.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The message inside a choice. `content` is null for some refusals and tool calls.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Author role, normally `assistant`.
    pub role: String,

    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage reported by the server.
#[derive(Debug, Copy, Clone, Deserialize, PartialEq, Eq)]
pub struct CompletionUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u64,

    /// Tokens in the completion.
    pub completion_tokens: u64,

    /// Sum of prompt and completion tokens.
    pub total_tokens: u64,
}

impl ChatCompletionResponse {
    /// Returns the text of the first choice, if there is one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_deref().unwrap_or(""))
    }
}
