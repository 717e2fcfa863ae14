//! Where a one-shot message comes from, and optional prompt enhancement.

use anyhow::{bail, Context, Result};
use std::io::{self, IsTerminal, Read};

use crate::constants::{ENHANCE_PROMPT, ONE_SHOT_TEMPERATURE};
use crate::message::ChatMessage;

use super::exchange::Exchange;

/// Reads stdin to the end when it is a pipe or file. Returns `None` for a terminal.
pub fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(Some(buf))
}

/// Combines piped content and positional arguments into the message to send.
///
/// Both present: the pipe is framed as context for the argument query.
/// Returns `None` when neither carries any text.
pub fn compose_message(piped: Option<&str>, args: &[String]) -> Option<String> {
    let piped = piped.map(str::trim).filter(|p| !p.is_empty());
    let joined = args.join(" ");
    let args = Some(joined.trim()).filter(|a| !a.is_empty());

    match (piped, args) {
        (Some(pipe), Some(query)) => Some(format!(
            "Context provided via pipe:\n---\n{pipe}\n---\n\nUser query based on arguments:\n{query}"
        )),
        (Some(pipe), None) => Some(pipe.to_string()),
        (None, Some(query)) => Some(query.to_string()),
        (None, None) => None,
    }
}

/// Rewrites `prompt` into a more specific one using `exchange`.
///
/// The model sometimes echoes the instruction format; anything up to a
/// `Refined Output:` marker is dropped.
pub async fn enhance_prompt(exchange: &Exchange, prompt: &str) -> Result<String> {
    let instruction = ENHANCE_PROMPT.replace("{prompt}", prompt);
    let messages = [ChatMessage::system(instruction)];
    let response = exchange
        .send(&messages, ONE_SHOT_TEMPERATURE)
        .await
        .context("Failed to enhance prompt")?;

    let Some(text) = response.first_content() else {
        bail!("No response received from the enhancement model");
    };
    let mut enhanced = text.trim();
    if let Some((_, after)) = enhanced.split_once("Refined Output:") {
        enhanced = after.trim();
    }
    if enhanced.is_empty() {
        bail!("The enhancement model returned an empty prompt");
    }
    Ok(enhanced.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ENHANCE_MODEL;
    use crate::message::{ChatCompletionResponse, Role};
    use crate::provider::fake::ScriptedProvider;
    use crate::provider::{ModelSelection, ProviderKind};

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_pipe_and_args_are_framed() {
        let msg = compose_message(Some("fn main() {}\n"), &args(&["Review", "this"])).unwrap();
        assert_eq!(
            msg,
            "Context provided via pipe:\n---\nfn main() {}\n---\n\nUser query based on arguments:\nReview this"
        );
    }

    #[test]
    fn test_single_source_is_used_as_is() {
        assert_eq!(compose_message(Some("  piped  "), &[]).unwrap(), "piped");
        assert_eq!(
            compose_message(None, &args(&["tell", "a", "joke"])).unwrap(),
            "tell a joke"
        );
    }

    #[test]
    fn test_whitespace_only_is_rejected() {
        assert_eq!(compose_message(Some(" \n\t"), &args(&["  "])), None);
        assert_eq!(compose_message(None, &[]), None);
    }

    #[tokio::test]
    async fn test_enhance_strips_refined_output_marker() {
        let fake = ScriptedProvider::new(ProviderKind::Groq)
            .reply("Input: generics?\nRefined Output: How do I use generics in Rust traits?");
        let log = fake.log();
        let exchange = Exchange::with_provider(
            ModelSelection {
                provider: ProviderKind::Groq,
                model: ENHANCE_MODEL.into(),
            },
            Box::new(fake),
        );

        let enhanced = enhance_prompt(&exchange, "generics?").await.unwrap();
        assert_eq!(enhanced, "How do I use generics in Rust traits?");

        let seen = log.lock().unwrap();
        assert_eq!(seen[0].model, "llama-3.3-70b-versatile");
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(seen[0].messages[0].role, Role::System);
        assert!(seen[0].messages[0].content.ends_with("generics?"));
    }

    #[tokio::test]
    async fn test_enhance_without_choices_fails() {
        let fake = ScriptedProvider::new(ProviderKind::Groq)
            .reply_with(Ok(ChatCompletionResponse::default()));
        let exchange = Exchange::with_provider(
            ModelSelection {
                provider: ProviderKind::Groq,
                model: ENHANCE_MODEL.into(),
            },
            Box::new(fake),
        );
        assert!(enhance_prompt(&exchange, "x").await.is_err());
    }
}
