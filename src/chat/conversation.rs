//! Multi-turn conversation state.
//!
//! A [`Conversation`] owns the running transcript and moves through
//! `AwaitingInput -> Dispatching -> Rendering -> AwaitingInput` for each
//! turn, ending in `Ended` on an exit token or end of input. Nothing is
//! persisted between runs.

use crate::constants::{CHAT_TEMPERATURE, EXIT_TOKENS};
use crate::error::Result;
use crate::message::{ChatMessage, Role};

use super::exchange::Exchange;

/// Where the interactive loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    AwaitingInput,
    Dispatching,
    Rendering,
    Ended,
}

/// Outcome of one line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Turn {
    /// Blank line, nothing sent.
    Skipped,
    /// An exit token was entered.
    Exited,
    /// The model answered. `None` if the response had no choices.
    Reply(Option<String>),
}

#[derive(Debug)]
pub struct Conversation {
    transcript: Vec<ChatMessage>,
    state: ChatState,
}

/// Whether `input` (already trimmed) ends the session. Case-sensitive.
pub fn is_exit_token(input: &str) -> bool {
    EXIT_TOKENS.iter().any(|token| *token == input)
}

impl Conversation {
    /// Starts a conversation, seeded with `system_prompt` unless it is blank.
    pub fn new(system_prompt: &str) -> Self {
        let mut transcript = Vec::new();
        if !system_prompt.trim().is_empty() {
            transcript.push(ChatMessage::system(system_prompt));
        }
        Self {
            transcript,
            state: ChatState::AwaitingInput,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Input ran out.
    pub fn end(&mut self) {
        self.state = ChatState::Ended;
    }

    /// The reply has been shown; ready for the next line.
    pub fn rendered(&mut self) {
        if self.state == ChatState::Rendering {
            self.state = ChatState::AwaitingInput;
        }
    }

    /// Handles one line of input.
    ///
    /// The user turn is appended before dispatch. If the exchange fails it
    /// is removed again, so the transcript only holds answered turns and the
    /// user can retry.
    pub async fn submit(&mut self, exchange: &Exchange, input: &str) -> Result<Turn> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Turn::Skipped);
        }
        if is_exit_token(input) {
            self.state = ChatState::Ended;
            return Ok(Turn::Exited);
        }

        self.transcript.push(ChatMessage::user(input));
        self.state = ChatState::Dispatching;

        match exchange.send(&self.transcript, CHAT_TEMPERATURE).await {
            Ok(response) => {
                self.state = ChatState::Rendering;
                let reply = response.first_content().map(str::to_string);
                if let Some(ref text) = reply {
                    self.transcript.push(ChatMessage::assistant(text.clone()));
                }
                Ok(Turn::Reply(reply))
            }
            Err(e) => {
                if self.transcript.last().map(|m| m.role) == Some(Role::User) {
                    self.transcript.pop();
                }
                self.state = ChatState::AwaitingInput;
                Err(e)
            }
        }
    }
}
