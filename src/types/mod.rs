// Public modules
pub mod chat_completion;
pub mod message;

// Re-exports
pub use chat_completion::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, ChoiceMessage,
    CompletionUsage,
};
pub use message::{Message, Role};
