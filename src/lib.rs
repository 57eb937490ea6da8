// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod markdown;
mod observability;
pub mod render;
pub mod style;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::{ChatCompletion, OpenAi};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use transcript::Transcript;
pub use types::*;
