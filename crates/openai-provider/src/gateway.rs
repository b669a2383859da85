//! Free-form chat gateway provider.
//!
//! Gateways proxy many upstream chat services behind an OpenAI-compatible
//! route. They need no credentials and are loose about their replies: the
//! body may be a chat completion object or just the generated text.

use provider_core::{async_trait, ProviderEntry, ProviderError, TextProvider};
use tracing::debug;

use crate::client::{parse_completion_body, ChatClient};
use crate::config::OpenAiProviderConfig;

/// A provider that calls a credential-free chat gateway.
pub struct GatewayProvider {
    client: ChatClient,
}

impl GatewayProvider {
    /// Create a new GatewayProvider with the given configuration.
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: ChatClient::new(config)?,
        })
    }

    /// Create a GatewayProvider from a provider configuration entry.
    pub fn from_entry(entry: &ProviderEntry) -> Result<Self, ProviderError> {
        Self::new(OpenAiProviderConfig::gateway_from_entry(entry))
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiProviderConfig {
        self.client.config()
    }
}

/// Interpret a gateway body as either a chat completion or plain text.
fn parse_gateway_body(body: &str) -> Result<String, ProviderError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    if trimmed.starts_with('{') {
        if let Ok(text) = parse_completion_body(trimmed) {
            return Ok(text);
        }
    }

    // Some gateways JSON-encode the bare string
    if trimmed.starts_with('"') {
        if let Ok(text) = serde_json::from_str::<String>(trimmed) {
            return if text.trim().is_empty() {
                Err(ProviderError::EmptyResponse)
            } else {
                Ok(text)
            };
        }
    }

    Ok(trimmed.to_string())
}

#[async_trait]
impl TextProvider for GatewayProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = self.client.post_chat(model, prompt).await?;
        let text = parse_gateway_body(&body)?;
        debug!(model = %model, chars = text.len(), "Gateway completion received");
        Ok(text)
    }

    fn name(&self) -> &str {
        "gateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_GATEWAY_BASE_URL;

    #[test]
    fn test_parse_chat_completion_body() {
        let body = r#"{"choices": [{"message": {"content": "gateway says hi"}}]}"#;
        assert_eq!(parse_gateway_body(body).unwrap(), "gateway says hi");
    }

    #[test]
    fn test_parse_plain_text_body() {
        assert_eq!(parse_gateway_body("  just text \n").unwrap(), "just text");
    }

    #[test]
    fn test_parse_json_string_body() {
        assert_eq!(parse_gateway_body(r#""quoted text""#).unwrap(), "quoted text");
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(matches!(
            parse_gateway_body("   "),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_unrecognized_json_passes_through() {
        // The orchestrator decides whether this is usable
        let body = r#"{"detail": "rate limited"}"#;
        assert_eq!(parse_gateway_body(body).unwrap(), body);
    }

    #[test]
    fn test_from_entry_uses_default_url() {
        let provider = GatewayProvider::from_entry(&ProviderEntry::default()).unwrap();
        assert_eq!(provider.config().base_url, DEFAULT_GATEWAY_BASE_URL);
        assert_eq!(provider.name(), "gateway");
    }
}
