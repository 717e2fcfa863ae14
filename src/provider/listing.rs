//! Model listing and the cached model lists.
//!
//! `suggest models` queries every reachable provider live. `suggest
//! update-models` stores the lists in the config so the resolver can place
//! model names no prefix rule recognises.

use tracing::{debug, info};

use super::client::{provider_for, ChatProvider};
use super::kind::ProviderKind;
use crate::config::Config;
use crate::error::Result;

/// Providers whose model list is cached in the config.
pub fn cacheable(kind: ProviderKind) -> bool {
    kind.needs_api_key()
}

/// Providers worth querying with this config: keyed providers with a key set,
/// plus the local daemon.
pub fn reachable_providers(config: &Config) -> Vec<ProviderKind> {
    ProviderKind::ALL
        .into_iter()
        .filter(|kind| !kind.needs_api_key() || config.api_key(*kind).is_some())
        .collect()
}

/// Fetches the live model list of one provider, sorted.
pub async fn fetch_models(kind: ProviderKind, config: &Config) -> Result<Vec<String>> {
    let provider = provider_for(kind, config)?;
    fetch_from(provider.as_ref()).await
}

async fn fetch_from(provider: &dyn ChatProvider) -> Result<Vec<String>> {
    let mut models = provider.list_models().await?;
    models.sort();
    models.dedup();
    debug!(provider = %provider.kind(), count = models.len(), "fetched model list");
    Ok(models)
}

/// Replaces the cached list for `provider` with its live list.
///
/// Returns how many models were stored. The config is left untouched on error.
pub async fn refresh_from(config: &mut Config, provider: &dyn ChatProvider) -> Result<usize> {
    let models = fetch_from(provider).await?;
    let count = models.len();
    config.set_cached_models(provider.kind(), models);
    info!(provider = %provider.kind(), count, "updated cached models");
    Ok(count)
}

/// Refreshes the cache of `only`, or of every cacheable provider with a key.
///
/// Each provider is tried independently; the result per provider is returned
/// so the caller can report partial failures.
pub async fn refresh_models(
    config: &mut Config,
    only: Option<ProviderKind>,
) -> Vec<(ProviderKind, Result<usize>)> {
    let kinds: Vec<ProviderKind> = match only {
        Some(kind) => vec![kind],
        None => reachable_providers(config)
            .into_iter()
            .filter(|kind| cacheable(*kind))
            .collect(),
    };

    let mut outcomes = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let outcome = match provider_for(kind, config) {
            Ok(provider) => refresh_from(config, provider.as_ref()).await,
            Err(e) => Err(e),
        };
        outcomes.push((kind, outcome));
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuggestError;
    use crate::provider::fake::ScriptedProvider;

    #[test]
    fn test_reachable_providers_need_keys() {
        let mut cfg = Config::default();
        assert_eq!(reachable_providers(&cfg), vec![ProviderKind::Ollama]);
        cfg.groq_api_key = "gsk".into();
        assert_eq!(
            reachable_providers(&cfg),
            vec![ProviderKind::Groq, ProviderKind::Ollama]
        );
    }

    #[tokio::test]
    async fn test_refresh_stores_sorted_list() {
        let mut cfg = Config::default();
        let provider = ScriptedProvider::new(ProviderKind::Groq).with_models(&[
            "mixtral-8x7b-32768",
            "gemma2-9b-it",
            "gemma2-9b-it",
        ]);
        let count = refresh_from(&mut cfg, &provider).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(cfg.models.groq, vec!["gemma2-9b-it", "mixtral-8x7b-32768"]);
    }

    #[tokio::test]
    async fn test_refresh_without_key_reports_missing_credential() {
        let mut cfg = Config::default();
        let outcomes = refresh_models(&mut cfg, Some(ProviderKind::OpenAI)).await;
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].1,
            Err(SuggestError::MissingCredential(ProviderKind::OpenAI))
        ));
        assert!(cfg.models.openai.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_all_skips_unkeyed_providers() {
        let mut cfg = Config::default();
        assert!(refresh_models(&mut cfg, None).await.is_empty());
    }
}
