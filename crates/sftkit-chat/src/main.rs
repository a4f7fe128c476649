//! Exercise a hosted chat-completions API from the command line
//!
//! # Usage
//!
//! ```bash
//! # one-shot
//! sftkit-chat "Hello!"
//!
//! # multi-turn REPL (type 'q' to quit)
//! sftkit-chat --interactive
//! ```
//!
//! The API key is read from the environment variable named by
//! `--api-key-env` (default `DEEPSEEK_API_KEY`).

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use sftkit_chat::{ChatSession, HttpChatClient};

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant, please add '>_<' after answering each question.";

/// Send chat-completion requests to an OpenAI-compatible endpoint
#[derive(Parser, Debug)]
#[command(name = "sftkit-chat")]
#[command(about = "Issue example chat-completion calls to a hosted LLM API")]
struct Args {
    /// Message to send in one-shot mode (ignored with --interactive)
    #[arg(value_name = "MESSAGE", default_value = "Hello!")]
    message: String,

    /// Base URL of the chat-completions API
    #[arg(long, default_value = "https://api.deepseek.com")]
    base_url: String,

    /// Model name to request
    #[arg(long, default_value = "deepseek-chat")]
    model: String,

    /// Environment variable holding the API key
    #[arg(long, default_value = "DEEPSEEK_API_KEY")]
    api_key_env: String,

    /// System prompt for the conversation
    #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
    system: String,

    /// Run a multi-turn REPL instead of a single exchange
    #[arg(long)]
    interactive: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let api_key = std::env::var(&args.api_key_env)
        .with_context(|| format!("Environment variable {} is not set", args.api_key_env))?;
    let client = HttpChatClient::new(&args.base_url, &api_key)?;
    let mut session = ChatSession::new(client, &args.model, &args.system);

    if args.interactive {
        run_repl(&mut session)
    } else {
        let reply = session.send(&args.message)?;
        println!("assistant> {reply}");
        Ok(())
    }
}

fn run_repl(session: &mut ChatSession<HttpChatClient>) -> Result<()> {
    println!("Interactive chat with {}. Type 'q' to quit.\n", session.model());

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            // EOF (e.g. piped input ran out)
            println!();
            return Ok(());
        }

        let input = line.trim();
        if input == "q" {
            println!("Conversation ended.");
            return Ok(());
        }
        if input.is_empty() {
            println!("Input cannot be empty.");
            continue;
        }

        match session.send(input) {
            Ok(reply) => println!("assistant> {reply}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}
