//! Terminal output for the chat session.
//!
//! This module provides the [`Renderer`] trait the session writes through and
//! [`TerminalRenderer`], which styles the input prefix and reply header with
//! ANSI colors and renders replies as Markdown.

use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::chat::SessionMode;
use crate::error::Result;
use crate::markdown::render_markdown;
use crate::observability::RENDER_FAILURES;
use crate::style::{DEFAULT_STYLES_DIR, StyleConfig, StylePrimitive};

/// Column at which rendered replies wrap.
pub const DEFAULT_WRAP_WIDTH: usize = 100;

/// ANSI-256 color of the working directory in the input prefix.
const DIR_COLOR: &str = "86";
/// ANSI-256 color of the "You" label.
const YOU_COLOR: &str = "183";
/// ANSI-256 color of the multi-line indicator.
const MULTILINE_COLOR: &str = "204";
/// ANSI-256 color of the assistant's name.
const AI_NAME_COLOR: &str = "39";
/// ANSI-256 color of the model identifier.
const MODEL_COLOR: &str = "178";

/// Output side of the chat session.
///
/// The session never writes to the terminal directly; every notice, error,
/// prompt and reply goes through this trait.
pub trait Renderer {
    /// Print an informational notice.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Build the prompt shown before input is read.
    fn input_prefix(&self, dir: &str, mode: SessionMode) -> String;

    /// Print a prompt on its own line (used before multi-line input).
    fn print_prefix(&mut self, prefix: &str);

    /// Render an assistant reply.
    ///
    /// Writes a header naming the assistant and model, then `reply` rendered
    /// as Markdown using the style named `style`.  Fails if the style cannot
    /// be loaded or the terminal cannot be written.
    fn render_reply(
        &mut self,
        reply: &str,
        style: &str,
        ai_name: &str,
        model: &str,
    ) -> Result<()>;
}

/// Renderer writing ANSI-styled output to stdout.
pub struct TerminalRenderer {
    stdout: Stdout,
    use_color: bool,
    styles_dir: PathBuf,
    width: usize,
}

impl TerminalRenderer {
    /// Creates a new TerminalRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new TerminalRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            styles_dir: PathBuf::from(DEFAULT_STYLES_DIR),
            width: DEFAULT_WRAP_WIDTH,
        }
    }

    /// Looks for style documents in `dir` instead of `styles/`.
    pub fn with_styles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.styles_dir = dir.into();
        self
    }

    /// Wraps replies at `width` columns.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    fn try_render(&mut self, reply: &str, style: &str, ai_name: &str, model: &str) -> Result<()> {
        let style = StyleConfig::load(&self.styles_dir, style)?;
        let header = reply_header(ai_name, model, self.use_color);
        let body = render_markdown(reply, &style, self.width, self.use_color);
        writeln!(self.stdout, "\n{header}: {body}")?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn print_info(&mut self, info: &str) {
        println!("{info}");
        println!();
        let _ = self.stdout.flush();
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("{error}");
    }

    fn input_prefix(&self, dir: &str, mode: SessionMode) -> String {
        input_prefix(dir, mode, self.use_color)
    }

    fn print_prefix(&mut self, prefix: &str) {
        println!("{prefix}");
        let _ = self.stdout.flush();
    }

    fn render_reply(
        &mut self,
        reply: &str,
        style: &str,
        ai_name: &str,
        model: &str,
    ) -> Result<()> {
        let result = self.try_render(reply, style, ai_name, model);
        if result.is_err() {
            RENDER_FAILURES.click();
        }
        result
    }
}

/// The prompt shown before reading input: `(dir) You: ` or `(dir) [Multiline] You: `.
pub fn input_prefix(dir: &str, mode: SessionMode, use_color: bool) -> String {
    let dir = StylePrimitive::fg(DIR_COLOR).apply(&format!("({dir})"), use_color);
    let you = StylePrimitive::fg(YOU_COLOR).bold().apply("You", use_color);
    match mode {
        SessionMode::SingleLine => format!("{dir} {you}: "),
        SessionMode::MultiLine => {
            let multi = StylePrimitive::fg(MULTILINE_COLOR).apply("[Multiline]", use_color);
            format!("{dir} {multi} {you}: ")
        }
    }
}

/// The reply header: the assistant's name followed by `(model)`.
pub fn reply_header(ai_name: &str, model: &str, use_color: bool) -> String {
    let name = StylePrimitive::fg(AI_NAME_COLOR)
        .bold()
        .apply(ai_name, use_color);
    let model = StylePrimitive::fg(MODEL_COLOR).apply(&format!("({model})"), use_color);
    format!("{name} {model}")
}

/// The current working directory with the home directory shown as `~`.
pub fn current_dir_display() -> String {
    match std::env::current_dir() {
        Ok(cwd) => relativize_home(&cwd, dirs::home_dir().as_deref()),
        Err(_) => "unknown".to_string(),
    }
}

/// Shows `dir` relative to `home` as `~/...` when it lies inside it.
pub fn relativize_home(dir: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = dir.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    dir.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = TerminalRenderer::new();
        assert!(renderer.use_color);
        assert_eq!(renderer.width, DEFAULT_WRAP_WIDTH);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = TerminalRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn plain_input_prefix() {
        assert_eq!(
            input_prefix("~/src", SessionMode::SingleLine, false),
            "(~/src) You: "
        );
        assert_eq!(
            input_prefix("~/src", SessionMode::MultiLine, false),
            "(~/src) [Multiline] You: "
        );
    }

    #[test]
    fn colored_input_prefix() {
        let prefix = input_prefix("/tmp", SessionMode::MultiLine, true);
        assert!(prefix.contains("\x1b[38;5;86m(/tmp)\x1b[0m"));
        assert!(prefix.contains("\x1b[38;5;204m[Multiline]\x1b[0m"));
        assert!(prefix.contains("\x1b[1;38;5;183mYou\x1b[0m"));
    }

    #[test]
    fn header() {
        assert_eq!(reply_header("Bot", "gpt-x", false), "Bot (gpt-x)");
        assert_eq!(
            reply_header("Bot", "gpt-x", true),
            "\x1b[1;38;5;39mBot\x1b[0m \x1b[38;5;178m(gpt-x)\x1b[0m"
        );
    }

    #[test]
    fn home_relative_dirs() {
        let home = Path::new("/home/ada");
        assert_eq!(relativize_home(Path::new("/home/ada"), Some(home)), "~");
        assert_eq!(
            relativize_home(Path::new("/home/ada/src/chat"), Some(home)),
            "~/src/chat"
        );
        assert_eq!(
            relativize_home(Path::new("/home/adam"), Some(home)),
            "/home/adam"
        );
        assert_eq!(relativize_home(Path::new("/srv"), None), "/srv");
    }

    #[test]
    fn missing_style_fails_render() {
        let mut renderer = TerminalRenderer::with_color(false)
            .with_styles_dir("/nonexistent/chatterm-styles");
        let err = renderer
            .render_reply("hello", "dark", "Bot", "gpt-x")
            .unwrap_err();
        assert!(err.is_style());
    }
}
