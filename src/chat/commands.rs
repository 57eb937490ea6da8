//! Meta-command classification for the chat REPL.
//!
//! Every raw input line is classified against the current [`SessionMode`]
//! into exactly one [`ChatCommand`].  Lines that are not commands come back
//! as [`ChatCommand::PlainText`] so the session can treat them as content.

/// Quit the session.
pub const CMD_QUIT: &str = ":q";
/// Enter or leave multi-line mode.
pub const CMD_MULTI: &str = ":multi";
/// Flush the pending multi-line input as one message.
pub const CMD_END: &str = ":end";
/// Drop the most recent pending line.
pub const CMD_REMOVE: &str = ":remove";
/// Load a file into the conversation; the file name follows the space.
pub const CMD_FILE: &str = ":file ";

/// How raw input lines are interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Each line is one turn.
    #[default]
    SingleLine,

    /// Lines accumulate until `:end`.
    MultiLine,
}

/// A classified line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Exit the chat application.
    Quit,

    /// Switch from single-line to multi-line mode.
    EnterMultiline,

    /// Leave multi-line mode, discarding pending lines.
    ExitMultiline,

    /// Remove the most recently added pending line.
    RemoveLast,

    /// Send the pending lines as one message.
    End,

    /// Inject the named file into the conversation.
    LoadFile(String),

    /// Ordinary content, captured verbatim.
    PlainText(String),
}

/// Classifies `line` for the given mode.
///
/// Command tokens compare case-insensitively against the whole line with no
/// trimming.  The `:file ` prefix is case-sensitive and the captured name and
/// text are kept verbatim.  `:q` quits in either mode.
///
/// # Examples
///
/// ```
/// # use chatterm::chat::{ChatCommand, SessionMode, classify};
/// assert_eq!(classify(SessionMode::SingleLine, ":Q"), ChatCommand::Quit);
/// assert_eq!(
///     classify(SessionMode::SingleLine, ":file notes.txt"),
///     ChatCommand::LoadFile("notes.txt".to_string())
/// );
/// assert_eq!(
///     classify(SessionMode::MultiLine, ":file notes.txt"),
///     ChatCommand::PlainText(":file notes.txt".to_string())
/// );
/// ```
pub fn classify(mode: SessionMode, line: &str) -> ChatCommand {
    let command = line.to_lowercase();
    if command == CMD_QUIT {
        return ChatCommand::Quit;
    }

    match mode {
        SessionMode::SingleLine => {
            if command == CMD_MULTI {
                ChatCommand::EnterMultiline
            } else if let Some(name) = line.strip_prefix(CMD_FILE) {
                ChatCommand::LoadFile(name.to_string())
            } else {
                ChatCommand::PlainText(line.to_string())
            }
        }
        SessionMode::MultiLine => match command.as_str() {
            CMD_MULTI => ChatCommand::ExitMultiline,
            CMD_REMOVE => ChatCommand::RemoveLast,
            CMD_END => ChatCommand::End,
            _ => ChatCommand::PlainText(line.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::SessionMode::{MultiLine, SingleLine};

    #[test]
    fn quit_in_both_modes() {
        assert_eq!(classify(SingleLine, ":q"), ChatCommand::Quit);
        assert_eq!(classify(SingleLine, ":Q"), ChatCommand::Quit);
        assert_eq!(classify(MultiLine, ":q"), ChatCommand::Quit);
    }

    #[test]
    fn multi_toggles_by_mode() {
        assert_eq!(classify(SingleLine, ":multi"), ChatCommand::EnterMultiline);
        assert_eq!(classify(SingleLine, ":MULTI"), ChatCommand::EnterMultiline);
        assert_eq!(classify(MultiLine, ":Multi"), ChatCommand::ExitMultiline);
    }

    #[test]
    fn no_trimming() {
        assert_eq!(
            classify(SingleLine, " :q"),
            ChatCommand::PlainText(" :q".to_string())
        );
        assert_eq!(
            classify(MultiLine, ":end "),
            ChatCommand::PlainText(":end ".to_string())
        );
    }

    #[test]
    fn file_prefix() {
        assert_eq!(
            classify(SingleLine, ":file My Notes.TXT"),
            ChatCommand::LoadFile("My Notes.TXT".to_string())
        );
        // prefix is case-sensitive
        assert_eq!(
            classify(SingleLine, ":FILE notes.txt"),
            ChatCommand::PlainText(":FILE notes.txt".to_string())
        );
        // needs the trailing space
        assert_eq!(
            classify(SingleLine, ":file"),
            ChatCommand::PlainText(":file".to_string())
        );
        assert_eq!(
            classify(SingleLine, ":file "),
            ChatCommand::LoadFile(String::new())
        );
    }

    #[test]
    fn multiline_only_commands() {
        assert_eq!(classify(MultiLine, ":remove"), ChatCommand::RemoveLast);
        assert_eq!(classify(MultiLine, ":END"), ChatCommand::End);
        assert_eq!(
            classify(SingleLine, ":end"),
            ChatCommand::PlainText(":end".to_string())
        );
        assert_eq!(
            classify(SingleLine, ":remove"),
            ChatCommand::PlainText(":remove".to_string())
        );
    }

    #[test]
    fn unknown_colon_lines_are_content() {
        assert_eq!(
            classify(MultiLine, ":wq"),
            ChatCommand::PlainText(":wq".to_string())
        );
        assert_eq!(
            classify(SingleLine, "Hello, World!"),
            ChatCommand::PlainText("Hello, World!".to_string())
        );
        assert_eq!(classify(SingleLine, ""), ChatCommand::PlainText(String::new()));
    }

    #[test]
    fn default_mode_is_single_line() {
        assert_eq!(SessionMode::default(), SingleLine);
    }
}
