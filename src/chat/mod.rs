//! Chat orchestration for suggest.
//!
//! [`run_once`] answers a single message. [`run_chat`] is the interactive
//! REPL: it uses [`rustyline`] for line editing and history, and sends the
//! whole transcript with each request so the model keeps context.

mod conversation;
mod exchange;
mod input;

pub use conversation::{is_exit_token, ChatState, Conversation, Turn};
pub use exchange::{build_messages, Exchange};
pub use input::{compose_message, enhance_prompt, read_piped_stdin};

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

use crate::config::Config;
use crate::constants::{HISTORY_FILENAME, ONE_SHOT_TEMPERATURE};
use crate::format;

/// Sends one message and prints the rendered answer.
///
/// A response with no choices prints nothing.
pub async fn run_once(exchange: &Exchange, system_prompt: &str, message: &str) -> Result<()> {
    let messages = build_messages(system_prompt, message);
    let response = exchange.send(&messages, ONE_SHOT_TEMPERATURE).await?;
    if let Some(text) = response.first_content() {
        println!("{}", format::render_markdown_lite(text));
    }
    Ok(())
}

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - `bye`, `stop` or `end`: ends the session
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: ends the session
/// - History is kept in `chat_history.txt` next to the config file
///
/// A failed exchange is reported and its user turn dropped; the loop goes on.
pub async fn run_chat(
    config: &Config,
    exchange: &Exchange,
    system_prompt: &str,
    history_dir: Option<&Path>,
) -> Result<()> {
    println!();
    println!(
        "Starting chat session with {} {}",
        exchange.model().cyan(),
        format!("({})", exchange.selection().provider).dimmed()
    );
    println!(
        "Type {}, {}, or {} to exit the conversation",
        "'bye'".blue(),
        "'stop'".blue(),
        "'end'".blue()
    );
    println!("Press {} to exit\n", "Ctrl+D".blue());

    let mut rl = DefaultEditor::new()?;
    let history_path = history_dir.map(|dir| dir.join(HISTORY_FILENAME));
    if let Some(path) = history_path.as_deref().filter(|p| p.exists()) {
        let _ = rl.load_history(path);
    }

    let prompt = format!("{} ", format!("{}:", config.display_name()).cyan().bold());
    let mut conversation = Conversation::new(system_prompt);

    while conversation.state() != ChatState::Ended {
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }
                match conversation.submit(exchange, &line).await {
                    Ok(Turn::Skipped) => {}
                    Ok(Turn::Exited) => {
                        println!("\n{}", "Ending chat session. Goodbye!".dimmed());
                    }
                    Ok(Turn::Reply(reply)) => {
                        if let Some(text) = reply {
                            println!();
                            println!("{}", format!("{}:", exchange.model()).cyan().bold());
                            println!("{}", format::render_markdown_lite(&text));
                            println!();
                        }
                        conversation.rendered();
                    }
                    Err(e) => {
                        eprintln!("{} {}", "error:".red().bold(), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                conversation.end();
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                conversation.end();
            }
        }
    }

    tracing::debug!(messages = conversation.messages().len(), "chat session ended");

    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}
