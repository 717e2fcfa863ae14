//! Adapter for OpenAI-compatible chat-completions APIs (OpenAI and Groq).
//!
//! The unified protocol already has this shape, so requests go out as-is
//! with a bearer token and responses only need null-safe decoding.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::client::{checked_body, ensure_messages, ChatProvider};
use super::kind::ProviderKind;
use crate::constants::{GROQ_BASE_URL, OPENAI_BASE_URL};
use crate::error::{Result, SuggestError};
use crate::message::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, Role};

/// Client for any endpoint speaking the OpenAI chat-completions protocol.
pub struct OpenAiCompatible {
    kind: ProviderKind,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    #[serde(default)]
    index: u32,
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default = "assistant_role")]
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireModelList {
    #[serde(default)]
    data: Vec<WireModel>,
}

#[derive(Debug, Deserialize)]
struct WireModel {
    id: String,
}

fn assistant_role() -> Role {
    Role::Assistant
}

impl OpenAiCompatible {
    /// Client for `api.openai.com`.
    pub fn openai(api_key: String, client: reqwest::Client) -> Self {
        Self::new(ProviderKind::OpenAI, OPENAI_BASE_URL, api_key, client)
    }

    /// Client for Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: String, client: reqwest::Client) -> Self {
        Self::new(ProviderKind::Groq, GROQ_BASE_URL, api_key, client)
    }

    /// Client for an arbitrary base URL (everything before `/chat/completions`).
    pub fn new(
        kind: ProviderKind,
        base_url: impl Into<String>,
        api_key: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            kind,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatible {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        ensure_messages(request)?;
        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = %self.kind, %url, model = %request.model, messages = request.messages.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(SuggestError::network(self.kind))?;
        let body = checked_body(self.kind, response).await?;

        let wire: WireResponse =
            serde_json::from_str(&body).map_err(|e| SuggestError::decode(self.kind, e))?;
        Ok(ChatCompletionResponse {
            choices: wire
                .choices
                .into_iter()
                .map(|c| Choice {
                    index: c.index,
                    message: ChatMessage {
                        role: c.message.role,
                        content: c.message.content.unwrap_or_default(),
                    },
                })
                .collect(),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);
        debug!(provider = %self.kind, %url, "listing models");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(SuggestError::network(self.kind))?;
        let body = checked_body(self.kind, response).await?;
        let list: WireModelList =
            serde_json::from_str(&body).map_err(|e| SuggestError::decode(self.kind, e))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}
