//! Line input and context-file reading for the chat REPL.

use std::collections::VecDeque;
use std::fs;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// One read from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line of text, without its trailing newline.
    Line(String),

    /// Ctrl-C at the prompt.
    Interrupted,

    /// End of input (Ctrl-D or a closed stdin).
    Eof,
}

/// A source of input lines.
pub trait LineSource {
    /// Reads one line, showing `prompt` first.
    fn read_line(&mut self, prompt: &str) -> Result<InputEvent>;

    /// Records an accepted line in the input history.
    fn add_history(&mut self, _line: &str) {}
}

/// Line source backed by a rustyline editor.
pub struct RustylineSource {
    editor: DefaultEditor,
}

impl RustylineSource {
    /// Creates an editor attached to the terminal.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Self { editor })
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(InputEvent::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
            Err(err) => Err(err.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if !line.is_empty() {
            let _ = self.editor.add_history_entry(line);
        }
    }
}

/// Line source that replays a fixed script, then reports end of input.
///
/// Useful for driving a session from something other than a terminal.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLines {
    events: VecDeque<Result<InputEvent>>,
    prompts: Vec<String>,
}

impl ScriptedLines {
    /// A script of plain lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: lines
                .into_iter()
                .map(|line| Ok(InputEvent::Line(line.into())))
                .collect(),
            prompts: Vec::new(),
        }
    }

    /// Appends an arbitrary event or read failure to the script.
    pub fn push(&mut self, event: Result<InputEvent>) {
        self.events.push_back(event);
    }

    /// Every prompt shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> Result<InputEvent> {
        self.prompts.push(prompt.to_string());
        self.events.pop_front().unwrap_or(Ok(InputEvent::Eof))
    }
}

/// Reads files named with `:file`.
pub trait ContextFiles {
    /// The full text of the file at `path`.
    fn read(&self, path: &str) -> Result<String>;
}

/// Reads context files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContextFiles;

impl ContextFiles for FsContextFiles {
    fn read(&self, path: &str) -> Result<String> {
        fs::read_to_string(path).map_err(|err| Error::io(format!("{path}: {err}"), err))
    }
}
