//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! state of the REPL: the transcript, the input mode, the pending multi-line
//! buffer and the active context file.  All terminal I/O goes through a
//! [`LineSource`] and a [`Renderer`], so the session can be driven by scripts.

use crate::chat::commands::{
    CMD_END, CMD_MULTI, CMD_QUIT, CMD_REMOVE, ChatCommand, SessionMode, classify,
};
use crate::chat::config::ChatConfig;
use crate::chat::input::{ContextFiles, FsContextFiles, InputEvent, LineSource};
use crate::client::ChatCompletion;
use crate::error::Result;
use crate::observability::{
    SESSION_CONTEXT_FILES, SESSION_MULTILINE_FLUSHES, SESSION_TURN_FAILURES, SESSION_TURNS,
};
use crate::render::{Renderer, current_dir_display};
use crate::transcript::Transcript;

const FILE_ERROR_PREFIX: &str = "Error reading file";
const INPUT_ERROR_PREFIX: &str = "Error reading input";
const MULTILINE_CALL_ERROR_PREFIX: &str = "Error communicating with AI";
const CALL_ERROR_PREFIX: &str = "Error";
const RENDER_ERROR_PREFIX: &str = "Error formatting response";

/// Whether the REPL keeps going after a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,

    /// Leave the REPL.
    Quit,
}

/// A chat session that manages conversation state and API interactions.
pub struct ChatSession<C: ChatCompletion, F: ContextFiles = FsContextFiles> {
    client: C,
    config: ChatConfig,
    files: F,
    transcript: Transcript,
    mode: SessionMode,
    pending: Vec<String>,
    context_file: Option<String>,
}

impl<C: ChatCompletion> ChatSession<C> {
    /// Creates a new chat session reading context files from disk.
    pub fn new(client: C, config: ChatConfig) -> Self {
        Self::with_files(client, config, FsContextFiles)
    }
}

impl<C: ChatCompletion, F: ContextFiles> ChatSession<C, F> {
    /// Creates a new chat session with a custom context-file reader.
    pub fn with_files(client: C, config: ChatConfig, files: F) -> Self {
        let transcript = Transcript::new(config.system_prompt.clone());
        Self {
            client,
            config,
            files,
            transcript,
            mode: SessionMode::SingleLine,
            pending: Vec::new(),
            context_file: None,
        }
    }

    /// Runs the REPL until `:q` or end of input.
    ///
    /// Turn failures (remote call, file read, rendering) are reported through
    /// `renderer` and the loop continues.  A failure to read a single-line
    /// prompt ends the session with that error.
    pub async fn run(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        renderer.print_info(&format!(
            "Entering interactive mode. Type {CMD_QUIT} to exit or {CMD_MULTI} to enter multiline mode."
        ));
        loop {
            let prefix = renderer.input_prefix(&current_dir_display(), self.mode);
            let flow = match self.mode {
                SessionMode::SingleLine => self.read_single_line(input, renderer, &prefix).await?,
                SessionMode::MultiLine => self.collect_multiline(input, renderer, &prefix).await,
            };
            if flow == Flow::Quit {
                renderer.print_info("Exiting interactive mode.");
                tracing::debug!(messages = self.transcript.len(), "session ended");
                return Ok(());
            }
        }
    }

    async fn read_single_line(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
        prefix: &str,
    ) -> Result<Flow> {
        let line = match input.read_line(prefix) {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Interrupted) => return Ok(Flow::Continue),
            Ok(InputEvent::Eof) => return Ok(Flow::Quit),
            Err(err) => {
                tracing::warn!(error = %err, "reading input failed");
                return Err(err);
            }
        };
        input.add_history(&line);
        Ok(self.handle_line(&line, renderer).await)
    }

    async fn collect_multiline(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
        prefix: &str,
    ) -> Flow {
        renderer.print_prefix(prefix);
        loop {
            let line = match input.read_line("") {
                Ok(InputEvent::Line(line)) => line,
                Ok(InputEvent::Interrupted) => continue,
                Ok(InputEvent::Eof) => return Flow::Quit,
                Err(err) => {
                    // the pending buffer survives; the next pass re-prompts
                    tracing::warn!(error = %err, "reading multiline input failed");
                    renderer.print_error(&format!("{INPUT_ERROR_PREFIX}: {err}"));
                    return Flow::Continue;
                }
            };
            input.add_history(&line);
            let command = classify(SessionMode::MultiLine, &line);
            let ends_collection = matches!(command, ChatCommand::End | ChatCommand::ExitMultiline);
            if self.execute(command, renderer).await == Flow::Quit {
                return Flow::Quit;
            }
            if ends_collection {
                return Flow::Continue;
            }
        }
    }

    /// Classifies one raw line against the current mode and executes it.
    pub async fn handle_line(&mut self, line: &str, renderer: &mut dyn Renderer) -> Flow {
        let command = classify(self.mode, line);
        self.execute(command, renderer).await
    }

    async fn execute(&mut self, command: ChatCommand, renderer: &mut dyn Renderer) -> Flow {
        match command {
            ChatCommand::Quit => return Flow::Quit,
            ChatCommand::EnterMultiline => {
                self.mode = SessionMode::MultiLine;
                self.pending.clear();
                renderer.print_info(&format!(
                    "Multiline mode. Type {CMD_END} to finish input, {CMD_REMOVE} to delete the most recent line."
                ));
            }
            ChatCommand::ExitMultiline => {
                self.mode = SessionMode::SingleLine;
                self.pending.clear();
                renderer.print_info("Exiting multiline mode.");
            }
            ChatCommand::RemoveLast => {
                if self.pending.pop().is_some() {
                    renderer.print_info("Last line removed.");
                } else {
                    renderer.print_info("No lines to remove.");
                }
            }
            ChatCommand::End => {
                let lines = std::mem::take(&mut self.pending);
                if !lines.is_empty() {
                    SESSION_MULTILINE_FLUSHES.click();
                    self.report_turn(lines.join("\n"), MULTILINE_CALL_ERROR_PREFIX, renderer)
                        .await;
                }
            }
            ChatCommand::LoadFile(name) => self.load_file(name, renderer),
            ChatCommand::PlainText(text) => match self.mode {
                SessionMode::MultiLine => self.pending.push(text),
                SessionMode::SingleLine => {
                    let content = match &self.context_file {
                        Some(file) => format!("(Context: {file}) {text}"),
                        None => text,
                    };
                    self.report_turn(content, CALL_ERROR_PREFIX, renderer).await;
                }
            },
        }
        Flow::Continue
    }

    fn load_file(&mut self, name: String, renderer: &mut dyn Renderer) {
        match self.files.read(&name) {
            Ok(contents) => {
                tracing::info!(file = %name, bytes = contents.len(), "loaded context file");
                SESSION_CONTEXT_FILES.click();
                self.transcript
                    .push_user(format!("Content of {name}:\n{contents}"));
                renderer.print_info(&format!("Added {name} to the context."));
                self.context_file = Some(name);
            }
            Err(err) => {
                tracing::warn!(file = %name, error = %err, "loading context file failed");
                renderer.print_error(&format!("{FILE_ERROR_PREFIX}: {err}"));
            }
        }
    }

    async fn report_turn(&mut self, content: String, prefix: &str, renderer: &mut dyn Renderer) {
        if let Err(err) = self.send_user_turn(content, renderer).await {
            renderer.print_error(&format!("{prefix}: {err}"));
        }
    }

    /// Appends a user message, calls the model with the whole transcript, and
    /// on success appends and renders the reply.
    ///
    /// # Errors
    ///
    /// Returns the remote-call error.  The user message stays in the
    /// transcript; no assistant message is added.  A render failure is
    /// reported through `renderer` and does not fail the turn.
    pub async fn send_user_turn(
        &mut self,
        content: impl Into<String>,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        SESSION_TURNS.click();
        self.transcript.push_user(content);
        tracing::debug!(messages = self.transcript.len(), model = %self.config.model, "sending turn");

        let reply = match self
            .client
            .complete(&self.config.model, self.transcript.snapshot())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                SESSION_TURN_FAILURES.click();
                return Err(err);
            }
        };
        self.transcript.push_assistant(reply.as_str());

        if let Err(err) = renderer.render_reply(
            &reply,
            &self.config.style,
            &self.config.ai_name,
            &self.config.model,
        ) {
            renderer.print_error(&format!("{RENDER_ERROR_PREFIX}: {err}"));
        }
        Ok(())
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The current input mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Lines collected in multi-line mode and not yet sent.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// The file most recently added with `:file`, if any.
    pub fn context_file(&self) -> Option<&str> {
        self.context_file.as_deref()
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

/// Sends `prompt` as the only user message after the system prompt and
/// renders the reply.
///
/// Failures are reported through `renderer` and returned.
pub async fn run_single_shot<C: ChatCompletion + ?Sized>(
    client: &C,
    config: &ChatConfig,
    prompt: &str,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    let mut transcript = Transcript::new(config.system_prompt.clone());
    transcript.push_user(prompt);

    SESSION_TURNS.click();
    let reply = match client.complete(&config.model, transcript.snapshot()).await {
        Ok(reply) => reply,
        Err(err) => {
            SESSION_TURN_FAILURES.click();
            renderer.print_error(&format!("{CALL_ERROR_PREFIX}: {err}"));
            return Err(err);
        }
    };
    if let Err(err) = renderer.render_reply(&reply, &config.style, &config.ai_name, &config.model) {
        renderer.print_error(&format!("{RENDER_ERROR_PREFIX}: {err}"));
        return Err(err);
    }
    Ok(())
}
