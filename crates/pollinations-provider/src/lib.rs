//! Pollinations text provider.
//!
//! Pollinations exposes a plain HTTP endpoint: POST a JSON body with the
//! prompt, get a JSON body back. No credentials are needed, only the
//! endpoint URL.

use std::time::Duration;

use provider_core::{async_trait, ProviderEntry, ProviderError, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default request timeout for the endpoint.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Request body sent to the endpoint.
#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    model: &'a str,
}

/// The shapes the endpoint is known to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PromptResponse {
    /// `{"response": "..."}`
    Simple { response: String },
    /// OpenAI-compatible route answering with chat choices.
    Chat { choices: Vec<ChatChoice> },
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A provider for the Pollinations text endpoint.
pub struct PollinationsProvider {
    client: Client,
    base_url: String,
}

impl PollinationsProvider {
    /// Create a provider for the given endpoint URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a provider with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "Pollinations base URL not configured".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(base_url = %base_url, "PollinationsProvider initialized");

        Ok(Self { client, base_url })
    }

    /// Create a provider from a provider configuration entry.
    pub fn from_entry(entry: &ProviderEntry) -> Result<Self, ProviderError> {
        let base_url = entry.base_url.clone().ok_or_else(|| {
            ProviderError::Configuration("Pollinations base URL not configured".to_string())
        })?;
        Self::new(base_url)
    }

    /// Get the endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull the generated text out of an endpoint response body.
fn parse_body(body: &str) -> Result<String, ProviderError> {
    let parsed: PromptResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let text = match parsed {
        PromptResponse::Simple { response } => Some(response),
        PromptResponse::Chat { choices } => choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content),
    };

    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyResponse),
    }
}

#[async_trait]
impl TextProvider for PollinationsProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = PromptRequest { prompt, model };

        debug!(url = %self.base_url, model = %model, "Sending Pollinations request");

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        parse_body(&body)
    }

    fn name(&self) -> &str {
        "pollinations"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_body() {
        let body = r#"{"response": "a short script"}"#;
        assert_eq!(parse_body(body).unwrap(), "a short script");
    }

    #[test]
    fn test_parse_chat_body() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "from chat"}}]}"#;
        assert_eq!(parse_body(body).unwrap(), "from chat");
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(matches!(
            parse_body(r#"{"response": ""}"#),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            parse_body(r#"{"choices": []}"#),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(
            parse_body("upstream timeout"),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_omits_empty_model() {
        let json = serde_json::to_value(PromptRequest { prompt: "hi", model: "" }).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "hi"}));

        let json = serde_json::to_value(PromptRequest { prompt: "hi", model: "openai-fast" }).unwrap();
        assert_eq!(json["model"], "openai-fast");
    }

    #[test]
    fn test_requires_base_url() {
        assert!(matches!(
            PollinationsProvider::new("  "),
            Err(ProviderError::Configuration(_))
        ));
        assert!(PollinationsProvider::from_entry(&ProviderEntry::default()).is_err());

        let provider = PollinationsProvider::new("https://text.example/openai").unwrap();
        assert_eq!(provider.base_url(), "https://text.example/openai");
        assert_eq!(provider.name(), "pollinations");
    }
}
