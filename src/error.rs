//! Error taxonomy for suggest.
//!
//! The core (config store, model resolver, provider adapters) reports
//! failures through [`SuggestError`]. The CLI layer wraps these in
//! `anyhow` with extra context before printing them.

use std::path::PathBuf;

use thiserror::Error;

use crate::provider::ProviderKind;

/// Everything the core can fail with.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The config file exists but could not be read or written.
    #[error("config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file exists but is not a valid document.
    #[error("failed to parse config at {path:?}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// No alias, prefix rule or cached model list matched the model name.
    #[error("model '{0}' not supported. Please use a Groq, OpenAI, Gemini, or Ollama model")]
    UnsupportedModel(String),

    /// The provider was resolved but has no API key configured.
    #[error("{0} API key not set. Run `suggest keys set {key}` or set {env}", key = .0.config_name(), env = .0.env_var().unwrap_or("the key in the config file"))]
    MissingCredential(ProviderKind),

    /// The request never produced an HTTP response.
    #[error("{provider} request failed: {source}")]
    Network {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// The provider rejected the credential.
    #[error("{provider} rejected the API key (HTTP {status}): {body}")]
    Auth {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    /// The provider answered with an error status or an embedded error object.
    #[error("{provider} API error ({status}): {message}")]
    Provider {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    /// The provider answered, but not with anything we could decode.
    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: ProviderKind,
        message: String,
    },

    /// A request was about to be dispatched with no messages.
    #[error("cannot send an empty conversation")]
    EmptyConversation,
}

impl SuggestError {
    /// Maps a non-2xx status and body onto [`SuggestError::Auth`] or [`SuggestError::Provider`].
    pub fn from_status(provider: ProviderKind, status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Self::Auth {
                provider,
                status: status.as_u16(),
                body,
            }
        } else {
            Self::Provider {
                provider,
                status: status.as_u16(),
                message: body,
            }
        }
    }

    pub(crate) fn network(provider: ProviderKind) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Network { provider, source }
    }

    pub(crate) fn decode(provider: ProviderKind, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            provider,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SuggestError>;
