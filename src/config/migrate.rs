//! Schema migration for configuration documents written by older versions.
//!
//! The file is first parsed into [`RawConfig`], where every field is optional
//! and the fields whose shape changed over time are modelled as untagged
//! enums: the current shape first, then each named legacy shape. [`migrate`]
//! folds a raw document into the current [`Config`]. It runs on every load,
//! and running it on an already-current document changes nothing.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::types::{Config, ModelsConfig, SystemPrompt, Template};
use crate::constants::LEGACY_PROMPT_TITLE;

/// A configuration document as found on disk, before migration.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    openai_api_key: Option<String>,
    groq_api_key: Option<String>,
    gemini_api_key: Option<String>,
    ollama_host: Option<String>,
    model: Option<String>,
    model_aliases: Option<BTreeMap<String, String>>,
    system_prompt: Option<String>,
    system_prompts: Option<Vec<PersistedPrompt>>,
    templates: Option<PersistedTemplates>,
    username: Option<String>,
    models: Option<RawModels>,
}

/// A system prompt entry in either the current or the legacy shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedPrompt {
    /// Current shape: `{title, content}`.
    Record(RawNamed),
    /// Legacy shape: the prompt text alone.
    Bare(String),
    /// Any other scalar or structure, kept as its YAML text.
    Other(serde_yaml::Value),
}

/// The template collection in either the current or the legacy shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedTemplates {
    /// Current shape: ordered list of `{title, content}`.
    List(Vec<RawNamed>),
    /// Legacy shape: `title: content` mapping, kept in file order.
    Map(serde_yaml::Mapping),
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawModels {
    openai: Option<Vec<String>>,
    groq: Option<Vec<String>>,
    gemini: Option<Vec<String>>,
}

/// Upgrades a raw document to the current schema.
///
/// Absent or null collections become empty, bare-string system prompts become
/// `{title: "Legacy Prompt", content}` records, and a legacy template mapping
/// becomes an ordered list. No entry is ever dropped.
pub fn migrate(raw: RawConfig) -> Config {
    let system_prompts = raw
        .system_prompts
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry {
            PersistedPrompt::Record(r) => SystemPrompt::new(r.title, r.content),
            PersistedPrompt::Bare(content) => SystemPrompt::new(LEGACY_PROMPT_TITLE, content),
            PersistedPrompt::Other(value) => SystemPrompt::new(LEGACY_PROMPT_TITLE, yaml_text(value)),
        })
        .collect();

    let templates = match raw.templates {
        None => Vec::new(),
        Some(PersistedTemplates::List(list)) => list
            .into_iter()
            .map(|r| Template::new(r.title, r.content))
            .collect(),
        Some(PersistedTemplates::Map(map)) => map
            .into_iter()
            .map(|(title, content)| Template::new(yaml_text(title), yaml_text(content)))
            .collect(),
    };

    let models = raw.models.unwrap_or_default();

    Config {
        openai_api_key: raw.openai_api_key.unwrap_or_default(),
        groq_api_key: raw.groq_api_key.unwrap_or_default(),
        gemini_api_key: raw.gemini_api_key.unwrap_or_default(),
        ollama_host: raw.ollama_host.filter(|h| !h.trim().is_empty()),
        model: raw.model.unwrap_or_default(),
        model_aliases: raw.model_aliases.unwrap_or_default(),
        system_prompt: raw.system_prompt.unwrap_or_default(),
        system_prompts,
        templates,
        username: raw.username.unwrap_or_default(),
        models: ModelsConfig {
            openai: models.openai.unwrap_or_default(),
            groq: models.groq.unwrap_or_default(),
            gemini: models.gemini.unwrap_or_default(),
        },
    }
}

/// Renders a YAML scalar from a legacy mapping as plain text.
fn yaml_text(value: serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
