//! Shared HTTP plumbing for chat completion endpoints.

use provider_core::ProviderError;
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiProviderConfig;

/// HTTP client bound to one chat completions endpoint.
pub(crate) struct ChatClient {
    http: Client,
    config: OpenAiProviderConfig,
}

impl ChatClient {
    pub(crate) fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    pub(crate) fn config(&self) -> &OpenAiProviderConfig {
        &self.config
    }

    /// POST a single-message chat completion and return the raw body.
    ///
    /// Non-success statuses are classified into [`ProviderError`].
    pub(crate) async fn post_chat(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let url = self.config.completions_url();
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(url = %url, model = %model, "Sending chat completion request");

        let mut builder = self.http.post(&url).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|api_error| api_error.error.message)
                .unwrap_or(body);
            return Err(ProviderError::from_status(status.as_u16(), detail));
        }

        Ok(body)
    }
}

/// Extract the first choice's text from a chat completion body.
pub(crate) fn parse_completion_body(body: &str) -> Result<String, ProviderError> {
    let completion: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    match completion.first_text() {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ProviderError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_body() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "Once upon a time"}}]}"#;
        assert_eq!(parse_completion_body(body).unwrap(), "Once upon a time");
    }

    #[test]
    fn test_parse_completion_body_empty() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#;
        assert!(matches!(
            parse_completion_body(body),
            Err(ProviderError::EmptyResponse)
        ));

        let body = r#"{"choices": []}"#;
        assert!(matches!(
            parse_completion_body(body),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_completion_body_garbage() {
        assert!(matches!(
            parse_completion_body("<html>502</html>"),
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
