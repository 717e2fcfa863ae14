//! Handlers that talk to a model: one-shot messages, templates and chat.

use anyhow::{bail, Context, Result};
use colored::Colorize;

use super::prompt;
use super::AskArgs;
use crate::chat::{self, Exchange};
use crate::config::{Config, ConfigStore};
use crate::constants::ENHANCE_MODEL;
use crate::format;
use crate::provider::{provider_for, ModelSelection, ProviderKind};
use crate::template;

/// A template picked with `-t`, plus its raw `--vars` list.
pub(super) struct TemplateChoice {
    title: String,
    vars: Option<String>,
}

impl TemplateChoice {
    pub(super) fn new(title: String, vars: Option<String>) -> Self {
        Self { title, vars }
    }

    /// The template content with its variables filled in.
    fn render(&self, config: &Config) -> Result<String> {
        let Some(tpl) = config.find_template(&self.title) else {
            bail!("Template '{}' not found", self.title);
        };
        let vars = template::parse_vars(self.vars.as_deref().unwrap_or_default());
        let missing: Vec<String> = template::extract_variables(&tpl.content)
            .into_iter()
            .filter(|v| !vars.contains_key(v))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(template = %self.title, ?missing, "template placeholders left unfilled");
        }
        Ok(template::apply(&tpl.content, &vars))
    }
}

/// The active system prompt, or the stored one titled by `-s`.
fn system_prompt<'a>(config: &'a Config, title: Option<&str>) -> Result<&'a str> {
    match title {
        Some(title) => match config.find_system_prompt(title) {
            Some(p) => Ok(p.content.as_str()),
            None => bail!("System prompt '{title}' not found"),
        },
        None => Ok(config.system_prompt.as_str()),
    }
}

/// The model named by `-m`, or the configured default.
pub(super) fn requested_model<'a>(config: &'a Config, args: &'a AskArgs) -> Result<&'a str> {
    let model = args.model.as_deref().unwrap_or(config.model.as_str()).trim();
    if model.is_empty() {
        bail!("No model set. Use --model or run `suggest model <name>`");
    }
    Ok(model)
}

/// Sends a one-shot message built from arguments, piped input or a template.
pub(super) async fn one_shot(
    store: &ConfigStore,
    args: &AskArgs,
    words: &[String],
    template: Option<TemplateChoice>,
    enhance: bool,
) -> Result<()> {
    let config = store.load_effective()?;

    let message = match template {
        Some(choice) => {
            if !words.is_empty() {
                tracing::warn!("ignoring message arguments because a template was given");
            }
            choice.render(&config)?
        }
        None => {
            let piped = chat::read_piped_stdin()?;
            match chat::compose_message(piped.as_deref(), words) {
                Some(message) => message,
                None => bail!(
                    "Please provide a message via arguments or pipe content. Use --help for more information."
                ),
            }
        }
    };
    if message.trim().is_empty() {
        bail!("Received empty or whitespace-only input.");
    }

    send(&config, args, message, enhance).await
}

/// `suggest template use`: fills a stored template and sends it.
pub(super) async fn use_template(
    store: &ConfigStore,
    args: &AskArgs,
    title: Option<String>,
    vars: Option<String>,
) -> Result<()> {
    let config = store.load_effective()?;
    let title = match title {
        Some(title) => title,
        None => {
            let items: Vec<String> = config
                .templates
                .iter()
                .map(|t| format!("{}  {}", t.title, format::truncate(&t.content, 50).dimmed()))
                .collect();
            if items.is_empty() {
                bail!("No templates stored. Add one with `suggest template add`");
            }
            let idx = prompt::select("Select template", &items)?;
            config.templates[idx].title.clone()
        }
    };
    let message = TemplateChoice::new(title, vars).render(&config)?;
    send(&config, args, message, false).await
}

async fn send(config: &Config, args: &AskArgs, message: String, enhance: bool) -> Result<()> {
    let system = system_prompt(config, args.system.as_deref())?;
    let exchange = Exchange::prepare(requested_model(config, args)?, config)?;

    let message = if enhance {
        let enhancer = Exchange::with_provider(
            ModelSelection {
                provider: ProviderKind::Groq,
                model: ENHANCE_MODEL.to_string(),
            },
            provider_for(ProviderKind::Groq, config)?,
        );
        let enhanced = chat::enhance_prompt(&enhancer, &message).await?;
        println!(
            "\n{}\n{}\n\n{}\n",
            "Enhanced prompt:".bold(),
            format::render_markdown_lite(&enhanced),
            "Processing enhanced prompt...".dimmed()
        );
        enhanced
    } else {
        message
    };

    chat::run_once(&exchange, system, &message).await
}

/// `suggest chat`: the interactive REPL.
pub(super) async fn chat(store: &ConfigStore, args: &AskArgs) -> Result<()> {
    let config = store.load_effective()?;
    let system = system_prompt(&config, args.system.as_deref())?;
    let exchange = Exchange::prepare(requested_model(&config, args)?, &config)
        .context("Cannot start chat")?;
    chat::run_chat(&config, &exchange, system, store.path().parent()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SystemPrompt, Template};

    fn config() -> Config {
        let mut cfg = Config::default();
        cfg.model = "llama-3.3-70b-versatile".into();
        cfg.system_prompt = "Active prompt".into();
        cfg.add_system_prompt(SystemPrompt::new("Programming Assistant", "You write code."));
        cfg.add_template(Template::new("Code Function", "Write a [language] function that [task]"));
        cfg
    }

    #[test]
    fn test_system_flag_overrides_active_prompt() {
        let cfg = config();
        assert_eq!(system_prompt(&cfg, None).unwrap(), "Active prompt");
        assert_eq!(
            system_prompt(&cfg, Some("Programming Assistant")).unwrap(),
            "You write code."
        );
        assert!(system_prompt(&cfg, Some("Missing")).is_err());
    }

    #[test]
    fn test_model_flag_overrides_default() {
        let cfg = config();
        let mut args = AskArgs::default();
        assert_eq!(requested_model(&cfg, &args).unwrap(), "llama-3.3-70b-versatile");
        args.model = Some("gpt-4o".into());
        assert_eq!(requested_model(&cfg, &args).unwrap(), "gpt-4o");
        assert!(requested_model(&Config::default(), &AskArgs::default()).is_err());
    }

    #[test]
    fn test_template_choice_fills_vars() {
        let cfg = config();
        let choice = TemplateChoice::new(
            "Code Function".into(),
            Some("language=Python,task=sorts a list".into()),
        );
        assert_eq!(
            choice.render(&cfg).unwrap(),
            "Write a Python function that sorts a list"
        );
        assert!(TemplateChoice::new("Nope".into(), None).render(&cfg).is_err());
    }
}
