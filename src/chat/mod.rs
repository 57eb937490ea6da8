//! Interactive chat REPL for an OpenAI-compatible chat completions API.
//!
//! This module provides the session state machine behind the `chatterm`
//! binary.  It supports:
//!
//! - Single-line turns, optionally tagged with the active context file
//! - Multi-line input collected until `:end`, with `:remove` to drop a line
//! - Injecting a file into the conversation with `:file <name>`
//! - A single-shot mode that sends one prompt and exits
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and the JSON configuration document
//! - [`commands`]: Meta-command classification
//! - [`input`]: Line sources and context-file reading
//! - [`session`]: The REPL state machine and the single-shot runner

mod commands;
mod config;
mod input;
mod session;

pub use crate::render::{Renderer, TerminalRenderer};
pub use commands::{
    CMD_END, CMD_FILE, CMD_MULTI, CMD_QUIT, CMD_REMOVE, ChatCommand, SessionMode, classify,
};
pub use config::{ChatArgs, ChatArgsError, ChatConfig, DEFAULT_CONFIG_PATH};
pub use input::{
    ContextFiles, FsContextFiles, InputEvent, LineSource, RustylineSource, ScriptedLines,
};
pub use session::{ChatSession, Flow, run_single_shot};
