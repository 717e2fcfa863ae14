//! The [`ChatProvider`] capability and adapter construction.
//!
//! Each backend implements [`ChatProvider`] once. [`provider_for`] picks the
//! adapter for a resolved [`ModelSelection`] and checks its credential before
//! anything touches the network.

use async_trait::async_trait;
use std::time::Duration;

use super::gemini::GeminiClient;
use super::kind::ProviderKind;
use super::ollama::OllamaClient;
use super::openai::OpenAiCompatible;
use crate::config::Config;
use crate::error::{Result, SuggestError};
use crate::message::{ChatCompletionRequest, ChatCompletionResponse};

/// A backend that can answer a chat completion request.
///
/// Implementations issue exactly one HTTP request per call and never retry.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which provider this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Sends `request` and translates the answer back into the unified protocol.
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;

    /// Lists the model ids the provider currently offers.
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Builds the adapter for `kind` from the loaded config.
///
/// # Errors
///
/// Returns [`SuggestError::MissingCredential`] if the provider needs an API
/// key and none is configured.
pub fn provider_for(kind: ProviderKind, config: &Config) -> Result<Box<dyn ChatProvider>> {
    let client = http_client(kind)?;
    let key = || {
        config
            .api_key(kind)
            .map(str::to_string)
            .ok_or(SuggestError::MissingCredential(kind))
    };
    let provider: Box<dyn ChatProvider> = match kind {
        ProviderKind::OpenAI => Box::new(OpenAiCompatible::openai(key()?, client)),
        ProviderKind::Groq => Box::new(OpenAiCompatible::groq(key()?, client)),
        ProviderKind::Gemini => Box::new(GeminiClient::new(key()?, client)),
        ProviderKind::Ollama => Box::new(OllamaClient::new(config.ollama_host(), client)),
    };
    Ok(provider)
}

/// HTTP client shared by all adapters, with an explicit request timeout.
pub fn http_client(kind: ProviderKind) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(crate::constants::HTTP_TIMEOUT_SECS))
        .build()
        .map_err(SuggestError::network(kind))
}

/// Reads the body of a response, turning any non-2xx status into an error.
pub(super) async fn checked_body(kind: ProviderKind, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await.map_err(SuggestError::network(kind))?;
    if !status.is_success() {
        return Err(SuggestError::from_status(kind, status, body));
    }
    Ok(body)
}

/// Rejects requests with no messages before they reach the wire.
pub(super) fn ensure_messages(request: &ChatCompletionRequest) -> Result<()> {
    if request.messages.is_empty() {
        return Err(SuggestError::EmptyConversation);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails_before_dispatch() {
        let cfg = Config::default();
        for kind in [ProviderKind::OpenAI, ProviderKind::Groq, ProviderKind::Gemini] {
            let err = provider_for(kind, &cfg).err().unwrap();
            assert!(matches!(err, SuggestError::MissingCredential(k) if k == kind));
        }
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let provider = provider_for(ProviderKind::Ollama, &Config::default()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Ollama);
    }

    #[test]
    fn test_configured_key_builds_adapter() {
        let mut cfg = Config::default();
        cfg.gemini_api_key = "AIza-test".into();
        let provider = provider_for(ProviderKind::Gemini, &cfg).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let req = ChatCompletionRequest::new("gpt-4o", Vec::new());
        assert!(matches!(
            ensure_messages(&req),
            Err(SuggestError::EmptyConversation)
        ));
    }
}
