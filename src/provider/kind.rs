//! Provider kind enumeration.
//!
//! Defines [`ProviderKind`], the closed set of backends suggest can talk to,
//! along with the per-provider names used in config keys and environment
//! variables.

use anyhow::anyhow;
use std::fmt;
use std::str::FromStr;

/// Identifies which LLM provider serves a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI (GPT models).
    OpenAI,
    /// Groq (OpenAI-compatible API).
    Groq,
    /// Google Gemini.
    Gemini,
    /// Ollama (local daemon, no API key).
    Ollama,
}

impl ProviderKind {
    /// Every provider, in display order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAI,
        ProviderKind::Groq,
        ProviderKind::Gemini,
        ProviderKind::Ollama,
    ];

    /// Lowercase name used on the command line and in config keys.
    pub fn config_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Environment variable holding this provider's API key, if it takes one.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }

    /// Whether requests to this provider need an API key.
    pub fn needs_api_key(&self) -> bool {
        self.env_var().is_some()
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    /// Parses a provider name. Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "groq" => Ok(Self::Groq),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: openai, groq, gemini, ollama"
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Groq => "Groq",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Ollama => "Ollama",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert_eq!(" groq ".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert!("anthropic".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_only_ollama_is_keyless() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.needs_api_key(), kind != ProviderKind::Ollama);
        }
    }
}
