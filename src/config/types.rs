//! Struct definitions for the suggest configuration document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for suggest, persisted as `~/.suggest/config.yaml`.
///
/// Every collection is always present in memory, even when the file omits
/// it, so callers never have to check for a missing map or list. Values are
/// only ever produced by [`migrate`](super::migrate::migrate) or by
/// [`Default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    /// OpenAI API key. Empty means unset.
    pub openai_api_key: String,
    /// Groq API key. Empty means unset.
    pub groq_api_key: String,
    /// Gemini API key. Empty means unset.
    pub gemini_api_key: String,
    /// Address of the local Ollama daemon. `None` means the default address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_host: Option<String>,
    /// Default model name or alias.
    pub model: String,
    /// Alias -> canonical model name. Keys are case-sensitive.
    pub model_aliases: BTreeMap<String, String>,
    /// Content of the currently active system prompt. Empty means none.
    pub system_prompt: String,
    /// Named system prompts, in the order they were added.
    pub system_prompts: Vec<SystemPrompt>,
    /// Named message templates with `[placeholder]` markers.
    pub templates: Vec<Template>,
    /// Name shown in front of the user's turns in chat.
    pub username: String,
    /// Model ids last fetched from each provider's model-list endpoint.
    pub models: ModelsConfig,
}

/// A stored system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPrompt {
    pub title: String,
    pub content: String,
}

/// A stored message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub title: String,
    pub content: String,
}

/// Cached model lists for the providers that publish one behind an API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub openai: Vec<String>,
    #[serde(default)]
    pub groq: Vec<String>,
    #[serde(default)]
    pub gemini: Vec<String>,
}

impl SystemPrompt {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Template {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Config {
    /// A starter document with stock prompts and templates, written by `suggest init`.
    pub fn starter() -> Self {
        let system_prompts: Vec<SystemPrompt> = crate::constants::STARTER_PROMPTS
            .iter()
            .map(|(title, content)| SystemPrompt::new(*title, *content))
            .collect();
        let system_prompt = system_prompts
            .first()
            .map(|p| p.content.clone())
            .unwrap_or_default();
        Self {
            model: crate::constants::STARTER_MODEL.to_string(),
            system_prompt,
            system_prompts,
            templates: crate::constants::STARTER_TEMPLATES
                .iter()
                .map(|(title, content)| Template::new(*title, *content))
                .collect(),
            ..Self::default()
        }
    }
}
