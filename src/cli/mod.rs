//! Command-line interface definition and dispatch for suggest.
//!
//! Uses [`clap`] for argument parsing with derive macros. With no subcommand,
//! the positional words (and any piped input) are sent as a one-shot message.
//! Everything else edits the config file or inspects providers.

mod ask;
mod cmd;
mod manage;
mod models;
mod prompt;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigStore;
use crate::constants::{APP_NAME, CONFIG_PATH_ENV};

/// Top-level CLI structure for suggest.
#[derive(Parser)]
#[command(
    name = APP_NAME,
    version,
    about = "Chat with AI models using Groq, OpenAI, Gemini, or Ollama",
    after_help = "Examples:\n  suggest Tell me a joke about programming\n  suggest -m gpt-4o What is the meaning of life?\n  suggest -t \"Code Function\" --vars \"language=Python,task=sort a list\"\n  cat code.py | suggest -s \"Programming Assistant\" \"Review this code\"\n  suggest chat"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Message to send
    pub message: Vec<String>,

    #[command(flatten)]
    pub ask: AskArgs,

    /// Use a stored template by title instead of a message
    #[arg(short, long)]
    pub template: Option<String>,

    /// Template variables (format: key1=value1,key2=value2)
    #[arg(long, requires = "template")]
    pub vars: Option<String>,

    /// Enhance the prompt before sending it
    #[arg(short, long)]
    pub enhance: bool,

    /// Path to the config file
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

/// Model and system prompt overrides shared by every command that chats.
#[derive(Args, Clone, Default)]
pub struct AskArgs {
    /// Model or alias to use (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Use a stored system prompt by title for this invocation
    #[arg(short, long, global = true)]
    pub system: Option<String>,
}

/// Available subcommands for the suggest CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,
    /// Suggest a shell command, then run, explain or refine it
    Cmd {
        /// What the command should do
        #[arg(required = true)]
        description: Vec<String>,
    },
    /// List the models each configured provider offers
    Models,
    /// Refresh the cached model lists (all keyed providers, or one)
    UpdateModels {
        /// Provider to refresh (openai, groq, gemini)
        provider: Option<String>,
    },
    /// Manage model aliases
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },
    /// Show or set provider API keys
    Keys {
        #[command(subcommand)]
        action: Option<KeysAction>,
    },
    /// Show or set the name used in chat
    Username {
        /// New username (prompted for when omitted)
        name: Option<String>,
    },
    /// Set the default model
    Model {
        /// Model or alias (chosen interactively when omitted)
        name: Option<String>,
    },
    /// Manage system prompts
    System {
        #[command(subcommand)]
        action: SystemAction,
    },
    /// Manage message templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Inspect the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum AliasAction {
    /// Point an alias at a model
    Add {
        alias: String,
        /// Canonical model name the alias stands for
        target: String,
    },
    /// Remove an alias
    Remove { alias: String },
    /// List aliases
    List,
}

#[derive(Subcommand)]
pub enum KeysAction {
    /// Store an API key and refresh that provider's model list
    Set {
        /// Provider (openai, groq, gemini)
        provider: String,
        /// The key (prompted for when omitted)
        key: Option<String>,
    },
    /// Store the address of the Ollama daemon
    OllamaHost { url: String },
}

#[derive(Subcommand)]
pub enum SystemAction {
    /// Store a new system prompt
    Add { title: String, content: String },
    /// Remove a system prompt (chosen interactively when no title is given)
    Remove { title: Option<String> },
    /// List system prompts
    List,
    /// Make a system prompt the active one
    Select { title: Option<String> },
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Store a new template; mark placeholders as [name]
    Add { title: String, content: String },
    /// Remove a template (chosen interactively when no title is given)
    Remove { title: Option<String> },
    /// List templates and their placeholders
    List,
    /// Fill a template and send it
    Use {
        /// Template title (chosen interactively when omitted)
        title: Option<String>,
        /// Template variables (format: key1=value1,key2=value2)
        #[arg(long)]
        vars: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the config file with keys masked
    Show,
    /// Print the config file path
    Path,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    let store = ConfigStore::locate(cli.config)?;
    let ask_args = cli.ask;

    match cli.command {
        None => {
            let template = cli
                .template
                .map(|title| ask::TemplateChoice::new(title, cli.vars));
            ask::one_shot(&store, &ask_args, &cli.message, template, cli.enhance).await
        }
        Some(Commands::Chat) => ask::chat(&store, &ask_args).await,
        Some(Commands::Cmd { description }) => cmd::cmd(&store, &ask_args, &description).await,
        Some(Commands::Models) => models::list(&store).await,
        Some(Commands::UpdateModels { provider }) => {
            models::update(&store, provider.as_deref()).await
        }
        Some(Commands::Alias { action }) => manage::alias(&store, action),
        Some(Commands::Keys { action }) => manage::keys(&store, action).await,
        Some(Commands::Username { name }) => manage::username(&store, name),
        Some(Commands::Model { name }) => manage::model(&store, name),
        Some(Commands::System { action }) => manage::system(&store, action),
        Some(Commands::Template {
            action: TemplateAction::Use { title, vars },
        }) => ask::use_template(&store, &ask_args, title, vars).await,
        Some(Commands::Template { action }) => manage::template(&store, action),
        Some(Commands::Init { force }) => manage::init(&store, force),
        Some(Commands::Config { action }) => manage::config(&store, action),
    }
}
