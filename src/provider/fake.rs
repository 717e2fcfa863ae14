//! Scripted in-memory provider for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::client::ChatProvider;
use super::kind::ProviderKind;
use crate::error::{Result, SuggestError};
use crate::message::{ChatCompletionRequest, ChatCompletionResponse};

/// Replies with queued results in order and records every request it saw.
pub struct ScriptedProvider {
    kind: ProviderKind,
    replies: Mutex<VecDeque<Result<ChatCompletionResponse>>>,
    models: Vec<String>,
    seen: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            replies: Mutex::new(VecDeque::new()),
            models: Vec::new(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply(self, content: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ChatCompletionResponse::single(content)));
        self
    }

    pub fn reply_with(self, result: Result<ChatCompletionResponse>) -> Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Shared handle to the request log, usable after the provider is boxed.
    pub fn log(&self) -> Arc<Mutex<Vec<ChatCompletionRequest>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SuggestError::Provider {
                provider: self.kind,
                status: 500,
                message: "no scripted reply left".into(),
            }))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.models.clone())
    }
}
