//! Lookups, edits and environment overrides on a loaded [`Config`].

use super::types::{Config, SystemPrompt, Template};
use crate::constants::{DEFAULT_USERNAME, OLLAMA_DEFAULT_BASE_URL, OLLAMA_HOST_ENV};
use crate::provider::ProviderKind;

impl Config {
    /// Returns the configured API key for `kind`, or `None` when it is empty.
    ///
    /// Ollama never has a key.
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::OpenAI => &self.openai_api_key,
            ProviderKind::Groq => &self.groq_api_key,
            ProviderKind::Gemini => &self.gemini_api_key,
            ProviderKind::Ollama => return None,
        };
        let key = key.trim();
        (!key.is_empty()).then_some(key)
    }

    /// Stores an API key. Returns `false` for providers that take no key.
    pub fn set_api_key(&mut self, kind: ProviderKind, key: impl Into<String>) -> bool {
        let slot = match kind {
            ProviderKind::OpenAI => &mut self.openai_api_key,
            ProviderKind::Groq => &mut self.groq_api_key,
            ProviderKind::Gemini => &mut self.gemini_api_key,
            ProviderKind::Ollama => return false,
        };
        *slot = key.into();
        true
    }

    /// Address of the Ollama daemon, falling back to `http://localhost:11434`.
    pub fn ollama_host(&self) -> &str {
        self.ollama_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(OLLAMA_DEFAULT_BASE_URL)
    }

    /// Applies `*_API_KEY` and `OLLAMA_HOST` environment variables for this invocation.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for kind in ProviderKind::ALL {
            let Some(var) = kind.env_var() else { continue };
            if let Some(val) = lookup(var).filter(|v| !v.trim().is_empty()) {
                self.set_api_key(kind, val);
            }
        }
        if let Some(host) = lookup(OLLAMA_HOST_ENV).filter(|v| !v.trim().is_empty()) {
            self.ollama_host = Some(normalize_host(&host));
        }
    }

    /// Cached model list for `kind`; Ollama has none.
    pub fn cached_models(&self, kind: ProviderKind) -> &[String] {
        match kind {
            ProviderKind::OpenAI => &self.models.openai,
            ProviderKind::Groq => &self.models.groq,
            ProviderKind::Gemini => &self.models.gemini,
            ProviderKind::Ollama => &[],
        }
    }

    /// Replaces the cached model list for `kind`.
    pub fn set_cached_models(&mut self, kind: ProviderKind, models: Vec<String>) {
        match kind {
            ProviderKind::OpenAI => self.models.openai = models,
            ProviderKind::Groq => self.models.groq = models,
            ProviderKind::Gemini => self.models.gemini = models,
            ProviderKind::Ollama => {}
        }
    }

    /// Name shown for the user's turns in chat.
    pub fn display_name(&self) -> &str {
        let name = self.username.trim();
        if name.is_empty() {
            DEFAULT_USERNAME
        } else {
            name
        }
    }

    // --- aliases ---

    /// Adds or replaces an alias. Returns the previous target, if any.
    pub fn set_alias(&mut self, alias: impl Into<String>, model: impl Into<String>) -> Option<String> {
        self.model_aliases.insert(alias.into(), model.into())
    }

    /// Removes an alias. Returns its target, or `None` if it did not exist.
    pub fn remove_alias(&mut self, alias: &str) -> Option<String> {
        self.model_aliases.remove(alias)
    }

    /// All aliases that point at `model`, sorted.
    pub fn aliases_for(&self, model: &str) -> Vec<&str> {
        self.model_aliases
            .iter()
            .filter(|(_, target)| target.as_str() == model)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    // --- system prompts ---

    pub fn find_system_prompt(&self, title: &str) -> Option<&SystemPrompt> {
        self.system_prompts.iter().find(|p| p.title == title)
    }

    /// Appends a prompt. Returns `false` if the title is already taken.
    pub fn add_system_prompt(&mut self, prompt: SystemPrompt) -> bool {
        if self.find_system_prompt(&prompt.title).is_some() {
            return false;
        }
        self.system_prompts.push(prompt);
        true
    }

    /// Removes the prompt titled `title`.
    ///
    /// If its content was the active system prompt, the active prompt is
    /// cleared as well. Returns the removed prompt.
    pub fn remove_system_prompt(&mut self, title: &str) -> Option<SystemPrompt> {
        let idx = self.system_prompts.iter().position(|p| p.title == title)?;
        let removed = self.system_prompts.remove(idx);
        if !self.system_prompt.is_empty() && removed.content == self.system_prompt {
            self.system_prompt.clear();
        }
        Some(removed)
    }

    /// Makes the prompt titled `title` the active one. Returns `false` if there is none.
    pub fn activate_system_prompt(&mut self, title: &str) -> bool {
        match self.find_system_prompt(title) {
            Some(p) => {
                self.system_prompt = p.content.clone();
                true
            }
            None => false,
        }
    }

    /// Whether `prompt` is the one currently active.
    pub fn is_active_prompt(&self, prompt: &SystemPrompt) -> bool {
        !self.system_prompt.is_empty() && prompt.content == self.system_prompt
    }

    // --- templates ---

    pub fn find_template(&self, title: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.title == title)
    }

    /// Appends a template. Returns `false` if the title is already taken.
    pub fn add_template(&mut self, template: Template) -> bool {
        if self.find_template(&template.title).is_some() {
            return false;
        }
        self.templates.push(template);
        true
    }

    pub fn remove_template(&mut self, title: &str) -> Option<Template> {
        let idx = self.templates.iter().position(|t| t.title == title)?;
        Some(self.templates.remove(idx))
    }

    /// A copy of the document with every API key masked, for display.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        copy.openai_api_key = mask_key(&self.openai_api_key);
        copy.groq_api_key = mask_key(&self.groq_api_key);
        copy.gemini_api_key = mask_key(&self.gemini_api_key);
        copy
    }
}

/// Masks a secret for display: `abcd****wxyz`, `****` when short, `not set` when empty.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.is_empty() {
        return "not set".to_string();
    }
    if chars.len() < 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

/// Strips trailing slashes and adds `http://` when no scheme is given.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
