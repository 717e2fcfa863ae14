//! Model resolution for suggest.
//!
//! Maps a requested model name (or alias) to a canonical model name and the
//! provider that serves it, without any network round trip.

use tracing::debug;

use super::kind::ProviderKind;
use crate::config::Config;
use crate::error::{Result, SuggestError};

/// Resolved provider + model pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Resolve which provider serves `requested`.
///
/// 1. If `requested` is an alias, it is replaced by its target. This happens
///    once: an alias pointing at another alias is not followed.
/// 2. The name is classified by [`classify`].
/// 3. Names no rule recognises are looked up in the model lists cached by
///    `suggest update-models`.
///
/// Fails with [`SuggestError::UnsupportedModel`] when nothing matches.
pub fn resolve_model(requested: &str, config: &Config) -> Result<ModelSelection> {
    let model = match config.model_aliases.get(requested) {
        Some(target) => {
            debug!(alias = requested, model = %target, "expanded model alias");
            target.clone()
        }
        None => requested.to_string(),
    };

    let provider = classify(&model)
        .or_else(|| cached_provider(&model, config))
        .ok_or_else(|| SuggestError::UnsupportedModel(model.clone()))?;

    debug!(%model, %provider, "resolved model");
    Ok(ModelSelection { provider, model })
}

/// Classifies a canonical model name by prefix.
///
/// Rules are tried in order: `gpt-` is OpenAI; `mixtral-` or `llama-` is Groq;
/// `gemini-` is Gemini; a name containing `:` or starting with `llama2`,
/// `codellama` or `mistral` is Ollama.
pub fn classify(model: &str) -> Option<ProviderKind> {
    if model.starts_with("gpt-") {
        Some(ProviderKind::OpenAI)
    } else if model.starts_with("mixtral-") || model.starts_with("llama-") {
        Some(ProviderKind::Groq)
    } else if model.starts_with("gemini-") {
        Some(ProviderKind::Gemini)
    } else if model.contains(':')
        || ["llama2", "codellama", "mistral"]
            .iter()
            .any(|prefix| model.starts_with(prefix))
    {
        Some(ProviderKind::Ollama)
    } else {
        None
    }
}

/// Finds the provider whose cached model list contains `model`.
fn cached_provider(model: &str, config: &Config) -> Option<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .find(|kind| config.cached_models(*kind).iter().any(|m| m == model))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_alias(alias: &str, model: &str) -> Config {
        let mut cfg = Config::default();
        cfg.set_alias(alias, model);
        cfg
    }

    #[test]
    fn test_prefix_rules() {
        let cases = [
            ("gpt-4o", ProviderKind::OpenAI),
            ("mixtral-8x7b-32768", ProviderKind::Groq),
            ("llama-3.3-70b-versatile", ProviderKind::Groq),
            ("gemini-1.5-pro", ProviderKind::Gemini),
            ("llama3:8b", ProviderKind::Ollama),
            ("llama2", ProviderKind::Ollama),
            ("codellama", ProviderKind::Ollama),
            ("mistral", ProviderKind::Ollama),
        ];
        let cfg = Config::default();
        for (name, expected) in cases {
            let sel = resolve_model(name, &cfg).unwrap();
            assert_eq!(sel.provider, expected, "{name}");
            assert_eq!(sel.model, name);
        }
    }

    #[test]
    fn test_precedence_is_fixed() {
        // Earlier rules win over the colon rule.
        assert_eq!(classify("gpt-4:custom"), Some(ProviderKind::OpenAI));
        assert_eq!(classify("llama-3:8b"), Some(ProviderKind::Groq));
        assert_eq!(classify("gemini-pro:latest"), Some(ProviderKind::Gemini));
    }

    #[test]
    fn test_alias_resolves_to_groq_model() {
        let cfg = config_with_alias("fast", "llama-3.3-70b-versatile");
        let sel = resolve_model("fast", &cfg).unwrap();
        assert_eq!(
            sel,
            ModelSelection {
                provider: ProviderKind::Groq,
                model: "llama-3.3-70b-versatile".into(),
            }
        );
        let direct = resolve_model("llama-3.3-70b-versatile", &cfg).unwrap();
        assert_eq!(direct.provider, sel.provider);
    }

    #[test]
    fn test_alias_is_not_followed_twice() {
        let mut cfg = config_with_alias("a", "b");
        cfg.set_alias("b", "gpt-4o");
        let err = resolve_model("a", &cfg).unwrap_err();
        assert!(matches!(err, SuggestError::UnsupportedModel(m) if m == "b"));
    }

    #[test]
    fn test_alias_keys_are_case_sensitive() {
        let cfg = config_with_alias("Fast", "gpt-4o");
        assert!(resolve_model("fast", &cfg).is_err());
        assert_eq!(resolve_model("Fast", &cfg).unwrap().model, "gpt-4o");
    }

    #[test]
    fn test_unknown_model_is_unsupported() {
        let err = resolve_model("unknown-model-xyz", &Config::default()).unwrap_err();
        assert!(matches!(err, SuggestError::UnsupportedModel(m) if m == "unknown-model-xyz"));
    }

    #[test]
    fn test_cached_list_is_fallback_only() {
        let mut cfg = Config::default();
        cfg.models.groq = vec!["qwen-qwq-32b".into(), "gpt-oss-20b".into()];
        assert_eq!(
            resolve_model("qwen-qwq-32b", &cfg).unwrap().provider,
            ProviderKind::Groq
        );
        // A prefix rule still wins over the cache.
        assert_eq!(
            resolve_model("gpt-oss-20b", &cfg).unwrap().provider,
            ProviderKind::OpenAI
        );
    }
}
