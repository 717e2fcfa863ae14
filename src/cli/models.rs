//! `suggest models` and `suggest update-models`.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::config::{Config, ConfigStore};
use crate::provider::{cacheable, fetch_models, reachable_providers, refresh_models, ProviderKind};

/// Lists the live models of every reachable provider, grouped by provider.
pub(super) async fn list(store: &ConfigStore) -> Result<()> {
    let config = store.load_effective()?;
    println!("Available models:\n");

    for kind in reachable_providers(&config) {
        println!("  {}:", kind.config_name().bold());
        match fetch_models(kind, &config).await {
            Ok(models) if models.is_empty() => {
                println!("    {}", "(no models found)".dimmed());
            }
            Ok(models) => {
                for model in &models {
                    println!("    {}", annotate(&config, model));
                }
            }
            Err(e) if kind == ProviderKind::Ollama => {
                tracing::debug!(error = %e, "ollama unreachable");
                println!("    {}", "(ollama not running)".dimmed());
            }
            Err(e) => println!("    {} {}", "unavailable:".yellow(), e),
        }
        println!();
    }

    let unkeyed: Vec<&str> = ProviderKind::ALL
        .into_iter()
        .filter(|k| k.needs_api_key() && config.api_key(*k).is_none())
        .map(|k| k.config_name())
        .collect();
    if !unkeyed.is_empty() {
        println!(
            "{}",
            format!("No API key for: {}", unkeyed.join(", ")).dimmed()
        );
    }
    Ok(())
}

/// `model` followed by the aliases that point at it, the default marked.
fn annotate(config: &Config, model: &str) -> String {
    let mut line = model.to_string();
    let aliases = config.aliases_for(model);
    if !aliases.is_empty() {
        line.push_str(&format!(" {}", format!("(alias: {})", aliases.join(", ")).cyan()));
    }
    if config.model == model || aliases.contains(&config.model.as_str()) {
        line.push_str(&format!(" {}", "(default)".green()));
    }
    line
}

/// Refreshes the cached model lists and saves them.
///
/// Keys from the environment are used for the requests but never written
/// to the file.
pub(super) async fn update(store: &ConfigStore, provider: Option<&str>) -> Result<()> {
    let only = provider.map(str::parse::<ProviderKind>).transpose()?;
    if let Some(kind) = only.filter(|k| !cacheable(*k)) {
        bail!("{kind} models are not cached; `suggest models` lists them live");
    }

    let mut persisted = store.load()?;
    let mut effective = store.load_effective()?;
    let outcomes = refresh_models(&mut effective, only).await;
    if outcomes.is_empty() {
        bail!("No provider has an API key. Run `suggest keys set <provider>` first");
    }

    let mut updated = 0;
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(count) => {
                persisted.set_cached_models(kind, effective.cached_models(kind).to_vec());
                updated += 1;
                println!("{} {kind}: {count} models", "updated".green());
            }
            Err(e) => eprintln!("{} {kind}: {e}", "failed".red()),
        }
    }
    if updated > 0 {
        store.save(&persisted)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_marks_aliases_and_default() {
        colored::control::set_override(false);
        let mut cfg = Config::default();
        cfg.model = "fast".into();
        cfg.set_alias("fast", "llama-3.3-70b-versatile");
        cfg.set_alias("quick", "llama-3.3-70b-versatile");
        assert_eq!(
            annotate(&cfg, "llama-3.3-70b-versatile"),
            "llama-3.3-70b-versatile (alias: fast, quick) (default)"
        );
        assert_eq!(annotate(&cfg, "gemma2-9b-it"), "gemma2-9b-it");
    }
}
