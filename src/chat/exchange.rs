//! A single request/response exchange with a resolved provider.

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::message::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::provider::{provider_for, resolve_model, ChatProvider, ModelSelection};

/// Builds the opening message list: the system prompt (if any) followed by
/// the user's content.
pub fn build_messages(system_prompt: &str, user: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system_prompt.trim().is_empty() {
        messages.push(ChatMessage::system(system_prompt));
    }
    messages.push(ChatMessage::user(user));
    messages
}

/// A resolved model bound to the adapter that serves it.
pub struct Exchange {
    selection: ModelSelection,
    provider: Box<dyn ChatProvider>,
}

impl Exchange {
    /// Resolves `requested` and builds its adapter.
    ///
    /// Fails on an unknown model or a missing credential, in both cases
    /// before anything is sent.
    pub fn prepare(requested: &str, config: &Config) -> Result<Self> {
        let selection = resolve_model(requested, config)?;
        let provider = provider_for(selection.provider, config)?;
        Ok(Self::with_provider(selection, provider))
    }

    pub fn with_provider(selection: ModelSelection, provider: Box<dyn ChatProvider>) -> Self {
        Self {
            selection,
            provider,
        }
    }

    /// Canonical name of the resolved model.
    pub fn model(&self) -> &str {
        &self.selection.model
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    /// Sends `messages` to the resolved model.
    pub async fn send(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest::new(self.selection.model.clone(), messages.to_vec())
            .with_temperature(temperature);
        debug!(provider = %self.selection.provider, model = %self.selection.model, "dispatching exchange");
        let response = self.provider.create_chat_completion(&request).await?;
        debug!(choices = response.choices.len(), "exchange complete");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuggestError;
    use crate::message::Role;
    use crate::provider::fake::ScriptedProvider;
    use crate::provider::ProviderKind;

    #[test]
    fn test_system_prompt_goes_first() {
        let messages = build_messages("Be terse.", "Hi");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], ChatMessage::user("Hi"));
    }

    #[test]
    fn test_blank_system_prompt_is_omitted() {
        assert_eq!(build_messages("  ", "Hi"), vec![ChatMessage::user("Hi")]);
    }

    #[test]
    fn test_unknown_model_fails_before_dispatch() {
        let err = Exchange::prepare("unknown-model-xyz", &Config::default())
            .err()
            .unwrap();
        assert!(matches!(err, SuggestError::UnsupportedModel(_)));
    }

    #[test]
    fn test_alias_with_missing_key_fails_before_dispatch() {
        let mut cfg = Config::default();
        cfg.set_alias("fast", "llama-3.3-70b-versatile");
        let err = Exchange::prepare("fast", &cfg).err().unwrap();
        assert!(matches!(err, SuggestError::MissingCredential(ProviderKind::Groq)));
    }

    #[test]
    fn test_prepare_resolves_alias() {
        let mut cfg = Config::default();
        cfg.groq_api_key = "gsk-test".into();
        cfg.set_alias("fast", "llama-3.3-70b-versatile");
        let exchange = Exchange::prepare("fast", &cfg).unwrap();
        assert_eq!(exchange.model(), "llama-3.3-70b-versatile");
        assert_eq!(exchange.selection().provider, ProviderKind::Groq);
    }

    #[tokio::test]
    async fn test_send_uses_canonical_model_and_temperature() {
        let fake = ScriptedProvider::new(ProviderKind::OpenAI).reply("Hello.");
        let log = fake.log();
        let exchange = Exchange::with_provider(
            ModelSelection {
                provider: ProviderKind::OpenAI,
                model: "gpt-4o".into(),
            },
            Box::new(fake),
        );

        let resp = exchange
            .send(&build_messages("", "Hi"), 0.7)
            .await
            .unwrap();
        assert_eq!(resp.first_content(), Some("Hello."));

        let seen = log.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gpt-4o");
        assert_eq!(seen[0].temperature, Some(0.7));
    }
}
