//! Adapter for Google's Gemini `generateContent` API.
//!
//! Gemini has no system role: system messages are sent as `user` turns, so
//! the distinction is lost on the way out. Errors can arrive inside a 200
//! body, so every response is checked for an `error` object.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::client::{ensure_messages, ChatProvider};
use super::kind::ProviderKind;
use crate::constants::GEMINI_BASE_URL;
use crate::error::{Result, SuggestError};
use crate::message::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, Role};

const KIND: ProviderKind = ProviderKind::Gemini;

/// Client for the Gemini REST API, authenticated with a `key` query parameter.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self::with_base_url(GEMINI_BASE_URL, api_key, client)
    }

    /// Client for a non-default base URL (everything before `/models`).
    pub fn with_base_url(base_url: impl Into<String>, api_key: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }
}

/// Maps unified roles onto Gemini's two roles. System turns become `user`.
fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::System | Role::User => "user",
    }
}

fn to_gemini_request(request: &ChatCompletionRequest) -> GeminiRequest {
    let contents = request
        .messages
        .iter()
        .map(|m| GeminiContent {
            role: Some(gemini_role(m.role).to_string()),
            parts: vec![GeminiPart {
                text: Some(m.content.clone()),
            }],
        })
        .collect();
    let generation_config = (request.temperature.is_some() || request.max_tokens.is_some())
        .then(|| GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        });
    GeminiRequest {
        contents,
        generation_config,
    }
}

/// Keeps the first text part of each candidate, as an assistant message.
fn from_gemini_response(response: GeminiResponse) -> ChatCompletionResponse {
    let mut choices = Vec::new();
    for candidate in response.candidates {
        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text));
        if let Some(text) = text {
            choices.push(Choice {
                index: choices.len() as u32,
                message: ChatMessage::assistant(text),
            });
        }
    }
    ChatCompletionResponse { choices }
}

/// Turns an embedded `error` object into the matching error variant.
fn embedded_error(http_status: reqwest::StatusCode, error: GeminiError) -> SuggestError {
    let status = error.code.unwrap_or(http_status.as_u16());
    let message = match error.status {
        Some(s) if !s.is_empty() => format!("{} ({s})", error.message),
        _ => error.message,
    };
    if status == 401 || status == 403 {
        SuggestError::Auth {
            provider: KIND,
            status,
            body: message,
        }
    } else {
        SuggestError::Provider {
            provider: KIND,
            status,
            message,
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        ensure_messages(request)?;
        if request.messages.iter().any(|m| m.role == Role::System) {
            warn!("Gemini has no system role; system messages are sent as user turns");
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        debug!(provider = %KIND, %url, messages = request.messages.len(), "sending generateContent");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&to_gemini_request(request))
            .send()
            .await
            .map_err(SuggestError::network(KIND))?;
        let status = response.status();
        let body = response.text().await.map_err(SuggestError::network(KIND))?;

        match serde_json::from_str::<GeminiResponse>(&body) {
            Ok(mut parsed) => {
                if let Some(error) = parsed.error.take().filter(|e| !e.message.is_empty()) {
                    return Err(embedded_error(status, error));
                }
                if !status.is_success() {
                    return Err(SuggestError::from_status(KIND, status, body));
                }
                Ok(from_gemini_response(parsed))
            }
            Err(_) if !status.is_success() => Err(SuggestError::from_status(KIND, status, body)),
            Err(e) => Err(SuggestError::decode(KIND, format!("{e}, body: {body}"))),
        }
    }

    /// Lists models that support `generateContent`, without the `models/` prefix.
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);
        debug!(provider = %KIND, %url, "listing models");
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(SuggestError::network(KIND))?;
        let body = super::client::checked_body(KIND, response).await?;
        let list: GeminiModelList =
            serde_json::from_str(&body).map_err(|e| SuggestError::decode(KIND, e))?;
        Ok(list
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect())
    }
}
