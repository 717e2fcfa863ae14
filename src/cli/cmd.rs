//! `suggest cmd`: asks the model for a shell command, then lets the user
//! run it, have it explained, or ask a follow-up that yields a new command.
//!
//! The transcript is kept across turns, so explanations and follow-ups see
//! every earlier suggestion.

use anyhow::{bail, Result};
use colored::Colorize;
use std::process::{ExitStatus, Stdio};

use super::ask::requested_model;
use super::prompt;
use super::AskArgs;
use crate::chat::{is_exit_token, Conversation, Exchange, Turn};
use crate::config::ConfigStore;
use crate::constants::{COMMAND_SYSTEM_PROMPT, EXPLAIN_REQUEST};
use crate::format;

/// What to do with a suggested command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Run,
    Explain,
    FollowUp,
    Exit,
}

impl Action {
    const ALL: [Action; 4] = [Action::Run, Action::Explain, Action::FollowUp, Action::Exit];

    fn label(self) -> &'static str {
        match self {
            Action::Run => "Run",
            Action::Explain => "Explain",
            Action::FollowUp => "Follow up",
            Action::Exit => "Exit",
        }
    }
}

/// Captured result of a shell run.
struct ShellOutput {
    status: ExitStatus,
    text: String,
}

/// Strips the fences or backticks models add despite being told not to.
fn clean_command(reply: &str) -> String {
    let trimmed = reply.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // Drop the info string (```sh) on the opening line.
            let body = rest.split_once('\n').map_or("", |(_, body)| body);
            body.trim_end().strip_suffix("```").unwrap_or(body)
        }
        None => trimmed,
    };
    let unfenced = unfenced.trim();
    unfenced
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(unfenced)
        .trim()
        .to_string()
}

/// Runs `command` through `sh -c` and captures stdout and stderr.
async fn run_shell(command: &str) -> Result<ShellOutput> {
    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?
        .wait_with_output()
        .await?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        text.push_str("\n--- stderr ---\n");
        text.push_str(&stderr);
    }
    Ok(ShellOutput {
        status: output.status,
        text,
    })
}

/// Sends one turn and returns the reply, failing on an empty response.
async fn ask_model(conversation: &mut Conversation, exchange: &Exchange, input: &str) -> Result<String> {
    let reply = match conversation.submit(exchange, input).await? {
        Turn::Reply(Some(text)) => text,
        Turn::Reply(None) => bail!("The model returned no answer"),
        Turn::Skipped | Turn::Exited => bail!("Nothing to send for '{input}'"),
    };
    conversation.rendered();
    Ok(reply)
}

/// Handler for `suggest cmd <description>`.
pub(super) async fn cmd(store: &ConfigStore, args: &AskArgs, words: &[String]) -> Result<()> {
    let description = words.join(" ");
    if description.trim().is_empty() {
        bail!("Please provide a command description");
    }

    let config = store.load_effective()?;
    let exchange = Exchange::prepare(requested_model(&config, args)?, &config)?;
    let mut conversation = Conversation::new(COMMAND_SYSTEM_PROMPT);

    let mut command = clean_command(&ask_model(&mut conversation, &exchange, &description).await?);
    let labels: Vec<String> = Action::ALL.iter().map(|a| a.label().to_string()).collect();

    loop {
        println!("\n{} {}\n", "Command:".bold(), command.cyan());
        match Action::ALL[prompt::select("Choose an action", &labels)?] {
            Action::Run => {
                let output = run_shell(&command).await?;
                print!("{}", output.text);
                if !output.status.success() {
                    bail!("Command exited with {}", output.status);
                }
                return Ok(());
            }
            Action::Explain => {
                let explanation = ask_model(&mut conversation, &exchange, EXPLAIN_REQUEST).await?;
                println!("\n{}", format::render_markdown_lite(&explanation));
            }
            Action::FollowUp => {
                let question = prompt::ask("Follow-up question:")?;
                if question.is_empty() {
                    continue;
                }
                if is_exit_token(&question) {
                    return Ok(());
                }
                command = clean_command(&ask_model(&mut conversation, &exchange, &question).await?);
            }
            Action::Exit => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ChatCompletionResponse, ChatMessage, Role};
    use crate::provider::fake::ScriptedProvider;
    use crate::provider::{ModelSelection, ProviderKind};

    fn exchange(fake: ScriptedProvider) -> Exchange {
        Exchange::with_provider(
            ModelSelection {
                provider: ProviderKind::OpenAI,
                model: "gpt-4o".into(),
            },
            Box::new(fake),
        )
    }

    #[test]
    fn test_clean_command_strips_fences_and_backticks() {
        assert_eq!(clean_command("ls -la\n"), "ls -la");
        assert_eq!(clean_command("`du -sh .`"), "du -sh .");
        assert_eq!(clean_command("```sh\nfind . -name '*.rs'\n```"), "find . -name '*.rs'");
        assert_eq!(clean_command("```\ngit status\n```\n"), "git status");
    }

    #[test]
    fn test_actions_are_listed_in_menu_order() {
        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels, ["Run", "Explain", "Follow up", "Exit"]);
    }

    #[tokio::test]
    async fn test_run_shell_captures_both_streams() {
        let out = run_shell("echo out; echo err >&2").await.unwrap();
        assert!(out.status.success());
        assert_eq!(out.text, "out\n\n--- stderr ---\nerr\n");

        let failed = run_shell("exit 3").await.unwrap();
        assert_eq!(failed.status.code(), Some(3));
    }

    #[tokio::test]
    async fn test_explain_sees_the_whole_transcript() {
        let fake = ScriptedProvider::new(ProviderKind::OpenAI)
            .reply("ls -la")
            .reply("Lists every file, hidden ones included.");
        let log = fake.log();
        let ex = exchange(fake);
        let mut conv = Conversation::new(COMMAND_SYSTEM_PROMPT);

        let command = ask_model(&mut conv, &ex, "list all files").await.unwrap();
        assert_eq!(command, "ls -la");
        ask_model(&mut conv, &ex, EXPLAIN_REQUEST).await.unwrap();

        let seen = log.lock().unwrap();
        let last = &seen[1].messages;
        assert_eq!(last.len(), 4);
        assert_eq!(last[0].role, Role::System);
        assert_eq!(last[0].content, COMMAND_SYSTEM_PROMPT);
        assert_eq!(last[2], ChatMessage::assistant("ls -la"));
        assert_eq!(last[3], ChatMessage::user(EXPLAIN_REQUEST));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let fake = ScriptedProvider::new(ProviderKind::OpenAI)
            .reply_with(Ok(ChatCompletionResponse::default()));
        let ex = exchange(fake);
        let mut conv = Conversation::new(COMMAND_SYSTEM_PROMPT);
        assert!(ask_model(&mut conv, &ex, "list files").await.is_err());
    }
}
