//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `getopts` and the JSON
//! configuration document that names the model, the assistant, the system
//! prompt, and the render style.

use std::fmt;
use std::fs;
use std::path::Path;

use getopts::Options;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default location of the configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Configuration for a chat session, loaded from the configuration document.
///
/// ```json
/// {
///   "model": "gpt-4o-mini",
///   "ai_name": "Bot",
///   "system_prompt": "You are a helpful assistant.",
///   "style": "dark"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// The model identifier, passed through to the API verbatim.
    pub model: String,

    /// Display name for the assistant.
    pub ai_name: String,

    /// System prompt that opens every conversation.
    pub system_prompt: String,

    /// Name of the render style, resolved to `styles/{style}.json`.
    pub style: String,
}

impl ChatConfig {
    /// Creates a configuration from its four parts.
    pub fn new(
        model: impl Into<String>,
        ai_name: impl Into<String>,
        system_prompt: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            ai_name: ai_name.into(),
            system_prompt: system_prompt.into(),
            style: style.into(),
        }
    }

    /// Parses a configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ChatConfig = serde_json::from_str(text).map_err(|err| {
            Error::config(format!("invalid config: {err}"), Some(Box::new(err)))
        })?;
        if config.model.trim().is_empty() {
            return Err(Error::config("model must not be empty", None));
        }
        Ok(config)
    }

    /// Loads the configuration document at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::config(
                format!("cannot read {}: {err}", path.display()),
                Some(Box::new(err)),
            )
        })?;
        Self::from_json(&text)
    }
}

/// Command-line arguments for the chatterm binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Prompt for single-shot mode.
    pub prompt: Option<String>,

    /// Run the interactive REPL.
    pub interactive: bool,

    /// Path to the configuration document.
    pub config: Option<String>,

    /// Disable ANSI colors and styles.
    pub no_color: bool,

    /// Print usage and exit.
    pub help: bool,
}

/// Reasons the command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatArgsError {
    /// getopts rejected the arguments.
    Parse(String),

    /// A positional argument was given; chatterm takes none.
    UnexpectedArgument(String),
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatArgsError::Parse(message) => write!(f, "{message}"),
            ChatArgsError::UnexpectedArgument(arg) => write!(f, "unexpected argument: {arg}"),
        }
    }
}

impl std::error::Error for ChatArgsError {}

impl ChatArgs {
    fn options() -> Options {
        let mut opts = Options::new();
        opts.optopt("p", "prompt", "Prompt for the LLM", "TEXT");
        opts.optflag("i", "interactive", "Run in interactive mode");
        opts.optopt(
            "c",
            "config",
            "Configuration file (default: config.json)",
            "PATH",
        );
        opts.optflag("", "no-color", "Disable ANSI colors/styles");
        opts.optflag("h", "help", "Print this help");
        opts
    }

    /// Parses arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> std::result::Result<Self, ChatArgsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let matches = Self::options()
            .parse(args)
            .map_err(|err| ChatArgsError::Parse(err.to_string()))?;
        if let Some(extra) = matches.free.first() {
            return Err(ChatArgsError::UnexpectedArgument(extra.clone()));
        }
        Ok(ChatArgs {
            prompt: matches.opt_str("prompt"),
            interactive: matches.opt_present("interactive"),
            config: matches.opt_str("config"),
            no_color: matches.opt_present("no-color"),
            help: matches.opt_present("help"),
        })
    }

    /// Usage text for `program`.
    pub fn usage(program: &str) -> String {
        let brief = format!("Usage: {program} [-i | -p PROMPT] [OPTIONS]");
        Self::options().usage(&brief)
    }

    /// The configuration path, falling back to [`DEFAULT_CONFIG_PATH`].
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
    }
}
