//! Terminal chat client for OpenAI-compatible chat completion APIs.
//!
//! # Usage
//!
//! ```bash
//! # Ask one question and exit
//! chatterm -p "What is a monad?"
//!
//! # Start the interactive REPL
//! chatterm -i
//!
//! # Use another configuration document and plain output
//! chatterm -i --config work.json --no-color
//! ```
//!
//! # Commands
//!
//! While chatting interactively:
//! - `:q` - Exit the application
//! - `:multi` - Enter (or leave) multi-line mode
//! - `:end` - Send the collected multi-line input
//! - `:remove` - Drop the most recent multi-line input line
//! - `:file <name>` - Add a file to the conversation
//!
//! Set `CHATTERM_LOG` (e.g. `CHATTERM_LOG=debug`) for diagnostic logging on stderr.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use chatterm::OpenAi;
use chatterm::chat::{
    ChatArgs, ChatConfig, ChatSession, RustylineSource, TerminalRenderer, run_single_shot,
};
use chatterm::client::api_key_from_env;

const LOG_ENV: &str = "CHATTERM_LOG";

/// Main entry point for the chatterm application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("chatterm");
    let args = match ChatArgs::parse(argv.iter().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}");
            eprint!("{}", ChatArgs::usage(program));
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        print!("{}", ChatArgs::usage(program));
        return ExitCode::SUCCESS;
    }

    let config = match ChatConfig::from_file(args.config_path()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {err}");
            return ExitCode::FAILURE;
        }
    };

    let api_key = match api_key_from_env() {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: OPENAI_API_KEY not found in env");
            return ExitCode::FAILURE;
        }
    };
    let client = match OpenAi::new(Some(api_key)) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut renderer = TerminalRenderer::with_color(!args.no_color);

    if args.interactive {
        let mut input = match RustylineSource::new() {
            Ok(input) => input,
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        };
        let mut session = ChatSession::new(client, config);
        if let Err(err) = session.run(&mut input, &mut renderer).await {
            eprintln!("Error reading input: {err}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    let prompt = match args.prompt.as_deref() {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            eprintln!("Error: prompt is required in non-interactive mode");
            eprint!("{}", ChatArgs::usage(program));
            return ExitCode::FAILURE;
        }
    };
    match run_single_shot(&client, &config, prompt, &mut renderer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
