//! Configuration for chat completion providers.

use std::time::Duration;

use provider_core::{ProviderEntry, ProviderError};

/// Default base URL for a locally hosted chat gateway.
pub const DEFAULT_GATEWAY_BASE_URL: &str = "http://localhost:1337/v1";

/// Default OpenAI API base URL.
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a chat completion provider.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    /// API base URL (without the `/chat/completions` suffix).
    pub base_url: String,

    /// API key for authentication (empty for the gateway).
    pub api_key: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: String::new(),
            max_tokens: Some(2000),
            temperature: Some(0.7),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenAiProviderConfig {
    /// Build an OpenAI configuration from a provider entry.
    ///
    /// Fails when the entry has no API key.
    pub fn openai_from_entry(entry: &ProviderEntry) -> Result<Self, ProviderError> {
        let api_key = entry
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::Configuration("OpenAI API key not configured".to_string()))?;

        let mut builder = Self::builder().api_key(api_key);
        if let Some(url) = &entry.base_url {
            builder = builder.base_url(url.clone());
        }
        Ok(builder.build())
    }

    /// Build a gateway configuration from a provider entry.
    pub fn gateway_from_entry(entry: &ProviderEntry) -> Self {
        let mut config = Self {
            base_url: entry
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GATEWAY_BASE_URL.to_string()),
            ..Self::default()
        };
        if let Some(key) = &entry.api_key {
            config.api_key = key.clone();
        }
        config
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiProviderConfigBuilder {
        OpenAiProviderConfigBuilder::default()
    }

    /// Full chat completions endpoint URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Builder for OpenAiProviderConfig.
#[derive(Debug, Default)]
pub struct OpenAiProviderConfigBuilder {
    config: OpenAiProviderConfig,
}

impl OpenAiProviderConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiProviderConfig {
        self.config
    }
}
