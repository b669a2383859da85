//! OpenAiProvider implementation using the chat completions API.

use provider_core::{async_trait, ProviderEntry, ProviderError, TextProvider};
use tracing::{debug, info};

use crate::client::{parse_completion_body, ChatClient};
use crate::config::OpenAiProviderConfig;

/// A provider that calls the OpenAI chat completions API.
///
/// Every call is a single stateless request with the prompt as the only
/// user message.
pub struct OpenAiProvider {
    client: ChatClient,
}

impl OpenAiProvider {
    /// Create a new OpenAiProvider with the given configuration.
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "OpenAI API key not configured".to_string(),
            ));
        }

        info!(base_url = %config.base_url, "OpenAiProvider initialized");

        Ok(Self {
            client: ChatClient::new(config)?,
        })
    }

    /// Create an OpenAiProvider from a provider configuration entry.
    pub fn from_entry(entry: &ProviderEntry) -> Result<Self, ProviderError> {
        Self::new(OpenAiProviderConfig::openai_from_entry(entry)?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiProviderConfig {
        self.client.config()
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = self.client.post_chat(model, prompt).await?;
        let text = parse_completion_body(&body)?;
        debug!(model = %model, chars = text.len(), "OpenAI completion received");
        Ok(text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
