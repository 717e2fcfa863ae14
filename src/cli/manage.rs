//! Handlers for commands that edit or show the config file.
//!
//! Each handler loads the persisted document (without environment
//! overrides), changes it in memory and writes the whole file back.

use anyhow::{bail, Result};
use colored::Colorize;

use super::prompt;
use super::{AliasAction, ConfigAction, KeysAction, SystemAction, TemplateAction};
use crate::config::{mask_key, normalize_host, Config, ConfigStore, SystemPrompt, Template};
use crate::format;
use crate::provider::{refresh_models, resolve_model, ProviderKind};
use crate::template;

fn warn(message: impl std::fmt::Display) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

/// Whether `model` shows up in any provider's cached model list.
fn is_known_model(config: &Config, model: &str) -> bool {
    ProviderKind::ALL
        .into_iter()
        .any(|kind| config.cached_models(kind).iter().any(|m| m == model))
}

pub(super) fn alias(store: &ConfigStore, action: AliasAction) -> Result<()> {
    let mut config = store.load()?;
    match action {
        AliasAction::Add { alias, target: model } => {
            if !is_known_model(&config, &model) {
                warn(format!(
                    "'{model}' is not in any cached model list (run `suggest update-models` to refresh)"
                ));
            }
            if let Some(previous) = config.set_alias(alias.clone(), model.clone()) {
                println!("Replacing alias {} -> {}", alias.cyan(), previous.dimmed());
            }
            store.save(&config)?;
            println!("Alias {} -> {} added", alias.cyan(), model.green());
        }
        AliasAction::Remove { alias } => {
            if config.remove_alias(&alias).is_none() {
                bail!("Alias '{alias}' not found");
            }
            store.save(&config)?;
            println!("Alias {} removed", alias.cyan());
        }
        AliasAction::List => {
            if config.model_aliases.is_empty() {
                println!("{}", "No aliases defined.".dimmed());
                println!("Add one with: {}", "suggest alias add <alias> <model>".cyan());
                return Ok(());
            }
            let width = config.model_aliases.keys().map(|a| a.len()).max().unwrap_or(0);
            for (alias, model) in &config.model_aliases {
                println!("  {:<width$}  -> {}", alias.cyan(), model);
            }
        }
    }
    Ok(())
}

pub(super) async fn keys(store: &ConfigStore, action: Option<KeysAction>) -> Result<()> {
    let mut config = store.load()?;
    match action {
        None => {
            for kind in ProviderKind::ALL.into_iter().filter(|k| k.needs_api_key()) {
                println!(
                    "{:<8} {}",
                    format!("{kind}:").bold(),
                    mask_key(config.api_key(kind).unwrap_or_default())
                );
            }
            println!("{:<8} {}", "Ollama:".bold(), config.ollama_host());
        }
        Some(KeysAction::Set { provider, key }) => {
            let kind: ProviderKind = provider.parse()?;
            if !kind.needs_api_key() {
                bail!("{kind} does not use an API key. Use `suggest keys ollama-host <url>`");
            }
            let key = match key {
                Some(key) => key,
                None => prompt::ask(&format!("{kind} API key:"))?,
            };
            let key = key.trim();
            if key.is_empty() {
                bail!("API key cannot be empty");
            }
            config.set_api_key(kind, key);
            store.save(&config)?;
            println!("{kind} API key updated");

            println!("{}", "Updating available models...".dimmed());
            for (kind, outcome) in refresh_models(&mut config, Some(kind)).await {
                match outcome {
                    Ok(count) => {
                        store.save(&config)?;
                        println!("{kind} models list updated ({count} models)");
                    }
                    Err(e) => warn(format!("could not update {kind} models: {e}")),
                }
            }
        }
        Some(KeysAction::OllamaHost { url }) => {
            if url.trim().is_empty() {
                bail!("Ollama host cannot be empty");
            }
            let host = normalize_host(&url);
            config.ollama_host = Some(host.clone());
            store.save(&config)?;
            println!("Ollama host set to {}", host.cyan());
        }
    }
    Ok(())
}

pub(super) fn username(store: &ConfigStore, name: Option<String>) -> Result<()> {
    let mut config = store.load()?;
    let name = match name {
        Some(name) => name,
        None => {
            println!("Current username: {}", config.display_name().cyan());
            prompt::ask("New username:")?
        }
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Username cannot be empty");
    }
    config.username = name.to_string();
    store.save(&config)?;
    println!("Username set to {}", name.cyan());
    Ok(())
}

pub(super) fn model(store: &ConfigStore, name: Option<String>) -> Result<()> {
    let mut config = store.load()?;
    let name = match name {
        Some(name) => name,
        None => {
            let choices = model_choices(&config);
            if choices.is_empty() {
                bail!("No cached models. Run `suggest update-models` or pass a model name");
            }
            let labels: Vec<String> = choices
                .iter()
                .map(|(name, note)| format!("{name}  {}", note.dimmed()))
                .collect();
            let idx = prompt::select("Select model", &labels)?;
            choices[idx].0.clone()
        }
    };

    let selection = resolve_model(&name, &config)?;
    config.model = name.clone();
    store.save(&config)?;
    println!(
        "Default model set to {} ({})",
        name.cyan(),
        selection.provider.to_string().dimmed()
    );
    Ok(())
}

/// Aliases first, then every cached model, each with a short note.
fn model_choices(config: &Config) -> Vec<(String, String)> {
    let mut choices: Vec<(String, String)> = config
        .model_aliases
        .iter()
        .map(|(alias, model)| (alias.clone(), format!("alias for {model}")))
        .collect();
    for kind in ProviderKind::ALL {
        for model in config.cached_models(kind) {
            choices.push((model.clone(), kind.to_string()));
        }
    }
    choices
}

pub(super) fn system(store: &ConfigStore, action: SystemAction) -> Result<()> {
    let mut config = store.load()?;
    match action {
        SystemAction::Add { title, content } => {
            if content.trim().is_empty() {
                bail!("System prompt content cannot be empty");
            }
            if !config.add_system_prompt(SystemPrompt::new(title.clone(), content)) {
                bail!("System prompt '{title}' already exists");
            }
            store.save(&config)?;
            println!("System prompt {} added", title.cyan());
        }
        SystemAction::Remove { title } => {
            let title = match title {
                Some(title) => title,
                None => pick_system_prompt(&config, "Select system prompt to remove")?,
            };
            if config.remove_system_prompt(&title).is_none() {
                bail!("System prompt '{title}' not found");
            }
            store.save(&config)?;
            println!("System prompt {} removed", title.cyan());
        }
        SystemAction::List => {
            if config.system_prompts.is_empty() {
                println!("{}", "No system prompts stored.".dimmed());
                return Ok(());
            }
            for p in &config.system_prompts {
                let marker = if config.is_active_prompt(p) {
                    "*".green().bold().to_string()
                } else {
                    " ".to_string()
                };
                println!("{marker} {}", p.title.bold());
                println!("    {}", format::truncate(&p.content, 60).dimmed());
            }
        }
        SystemAction::Select { title } => {
            let title = match title {
                Some(title) => title,
                None => pick_system_prompt(&config, "Select system prompt")?,
            };
            if !config.activate_system_prompt(&title) {
                bail!("System prompt '{title}' not found");
            }
            store.save(&config)?;
            println!("Active system prompt set to {}", title.cyan());
        }
    }
    Ok(())
}

fn pick_system_prompt(config: &Config, label: &str) -> Result<String> {
    if config.system_prompts.is_empty() {
        bail!("No system prompts stored");
    }
    let items: Vec<String> = config
        .system_prompts
        .iter()
        .map(|p| format!("{}  {}", p.title, format::truncate(&p.content, 50).dimmed()))
        .collect();
    let idx = prompt::select(label, &items)?;
    Ok(config.system_prompts[idx].title.clone())
}

/// Handles every template action except `use`, which sends a message.
pub(super) fn template(store: &ConfigStore, action: TemplateAction) -> Result<()> {
    let mut config = store.load()?;
    match action {
        TemplateAction::Add { title, content } => {
            if content.trim().is_empty() {
                bail!("Template content cannot be empty");
            }
            let vars = template::extract_variables(&content);
            if !config.add_template(Template::new(title.clone(), content)) {
                bail!("Template '{title}' already exists");
            }
            store.save(&config)?;
            println!("Template {} added", title.cyan());
            if !vars.is_empty() {
                println!("Variables: {}", vars.join(", ").yellow());
            }
        }
        TemplateAction::Remove { title } => {
            let title = match title {
                Some(title) => title,
                None => {
                    if config.templates.is_empty() {
                        bail!("No templates stored");
                    }
                    let items: Vec<String> =
                        config.templates.iter().map(|t| t.title.clone()).collect();
                    let idx = prompt::select("Select template to remove", &items)?;
                    items[idx].clone()
                }
            };
            if config.remove_template(&title).is_none() {
                bail!("Template '{title}' not found");
            }
            store.save(&config)?;
            println!("Template {} removed", title.cyan());
        }
        TemplateAction::List => {
            if config.templates.is_empty() {
                println!("{}", "No templates stored.".dimmed());
                return Ok(());
            }
            for t in &config.templates {
                println!("{}", t.title.bold());
                println!("    {}", highlight_placeholders(&t.content));
                let vars = template::extract_variables(&t.content);
                if !vars.is_empty() {
                    println!("    {} {}", "Variables:".dimmed(), vars.join(", ").yellow());
                }
            }
        }
        TemplateAction::Use { .. } => bail!("`template use` sends a message and is not a config edit"),
    }
    Ok(())
}

fn highlight_placeholders(content: &str) -> String {
    template::extract_variables(content)
        .iter()
        .fold(content.to_string(), |acc, var| {
            let marker = format!("[{var}]");
            acc.replace(&marker, &marker.yellow().to_string())
        })
}

pub(super) fn init(store: &ConfigStore, force: bool) -> Result<()> {
    if store.exists() && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite",
            store.path().display()
        );
    }
    store.save(&Config::starter())?;
    println!("Wrote starter config to {}", store.path().display().to_string().cyan());
    println!("Next: {}", "suggest keys set groq".cyan());
    Ok(())
}

pub(super) fn config(store: &ConfigStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = store.load()?;
            println!("{} {}", "Config path:".bold(), store.path().display());
            println!();
            print!("{}", serde_yaml::to_string(&config.redacted())?);
        }
        ConfigAction::Path => println!("{}", store.path().display()),
    }
    Ok(())
}
