//! Static provider configuration.
//!
//! Each provider kind has its own set of required fields. The loaded
//! configuration is immutable and only read by the orchestrator.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Pollinations text endpoint.
pub const DEFAULT_POLLINATIONS_BASE_URL: &str = "https://text.pollinations.ai/openai";

/// The provider families the orchestrator knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-style chat completions, requires an API key.
    OpenAi,
    /// Free-form chat gateway, needs no credentials.
    Gateway,
    /// Simple HTTP JSON endpoint, requires a base URL.
    Pollinations,
}

impl ProviderKind {
    /// All known provider kinds.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAi,
        ProviderKind::Gateway,
        ProviderKind::Pollinations,
    ];

    /// Get the configuration name of this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gateway => "gateway",
            ProviderKind::Pollinations => "pollinations",
        }
    }

    /// Environment variable prefix for this provider.
    fn env_prefix(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI",
            ProviderKind::Gateway => "GATEWAY",
            ProviderKind::Pollinations => "POLLINATIONS",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gateway" | "g4f" => Ok(ProviderKind::Gateway),
            "pollinations" => Ok(ProviderKind::Pollinations),
            other => Err(ProviderError::Configuration(format!(
                "unsupported provider '{}' (expected openai, gateway or pollinations)",
                other
            ))),
        }
    }
}

/// Configuration for a single provider.
///
/// Fields are provider-specific; which of them are required depends on the
/// [`ProviderKind`] the entry is used with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// API key for providers that need credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Endpoint base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Permitted model identifiers.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderEntry {
    /// Check whether this entry has every field `kind` requires.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.missing_field(kind).is_none()
    }

    /// Name of the first required field that is absent, if any.
    fn missing_field(&self, kind: ProviderKind) -> Option<&'static str> {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        match kind {
            ProviderKind::OpenAi if !present(&self.api_key) => Some("api_key"),
            ProviderKind::Pollinations if !present(&self.base_url) => Some("base_url"),
            _ => None,
        }
    }

    /// Check whether `model` is allowed by this entry.
    ///
    /// An empty model list permits any model.
    pub fn permits_model(&self, model: &str) -> bool {
        self.models.is_empty() || self.models.iter().any(|m| m == model)
    }
}

/// Provider configuration keyed by provider kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidersConfig {
    entries: HashMap<ProviderKind, ProviderEntry>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            ProviderKind::OpenAi,
            ProviderEntry {
                api_key: None,
                base_url: Some(DEFAULT_OPENAI_BASE_URL.to_string()),
                models: vec!["gpt-3.5-turbo".to_string(), "gpt-4".to_string()],
            },
        );
        entries.insert(
            ProviderKind::Gateway,
            ProviderEntry {
                api_key: None,
                base_url: None,
                models: vec!["gpt-3.5-turbo".to_string(), "gpt-4".to_string()],
            },
        );
        entries.insert(
            ProviderKind::Pollinations,
            ProviderEntry {
                api_key: None,
                base_url: Some(DEFAULT_POLLINATIONS_BASE_URL.to_string()),
                models: vec!["openai-fast".to_string()],
            },
        );
        Self { entries }
    }
}

impl ProvidersConfig {
    /// Create an empty configuration with no providers.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create configuration from environment variables, starting from defaults.
    ///
    /// Recognized variables, per provider prefix (`OPENAI`, `GATEWAY`, `POLLINATIONS`):
    /// - `<PREFIX>_API_KEY` - API key
    /// - `<PREFIX>_BASE_URL` - Endpoint base URL
    /// - `<PREFIX>_MODELS` - Comma-separated permitted models
    pub fn from_env() -> Self {
        let mut config = Self::default();

        for kind in ProviderKind::ALL {
            let prefix = kind.env_prefix();
            let entry = config.entries.entry(kind).or_default();

            if let Ok(key) = env::var(format!("{}_API_KEY", prefix)) {
                entry.api_key = Some(key);
            }
            if let Ok(url) = env::var(format!("{}_BASE_URL", prefix)) {
                entry.base_url = Some(url);
            }
            if let Ok(models) = env::var(format!("{}_MODELS", prefix)) {
                entry.models = parse_model_list(&models);
            }
        }

        config
    }

    /// Create a new config builder, starting from an empty configuration.
    pub fn builder() -> ProvidersConfigBuilder {
        ProvidersConfigBuilder::default()
    }

    /// Get the entry for a provider.
    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderEntry> {
        self.entries.get(&kind)
    }

    /// Check whether a provider is present and has its required fields.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.get(kind).is_some_and(|entry| entry.is_configured(kind))
    }

    /// Permitted models for a provider (empty when unknown).
    pub fn models(&self, kind: ProviderKind) -> &[String] {
        self.get(kind).map(|e| e.models.as_slice()).unwrap_or(&[])
    }

    /// Validate that `kind` can be called with `model`.
    ///
    /// Returns the provider entry on success.
    pub fn validate(&self, kind: ProviderKind, model: &str) -> Result<&ProviderEntry, ProviderError> {
        let entry = self.get(kind).ok_or_else(|| {
            ProviderError::Configuration(format!("provider '{}' is not configured", kind))
        })?;

        if let Some(field) = entry.missing_field(kind) {
            return Err(ProviderError::Configuration(format!(
                "provider '{}' is missing required field '{}'",
                kind, field
            )));
        }

        if model.trim().is_empty() {
            return Err(ProviderError::Configuration(format!(
                "no model specified for provider '{}'",
                kind
            )));
        }

        if !entry.permits_model(model) {
            return Err(ProviderError::Configuration(format!(
                "model '{}' is not permitted for provider '{}' (allowed: {})",
                model,
                kind,
                entry.models.join(", ")
            )));
        }

        Ok(entry)
    }
}

/// Builder for ProvidersConfig.
#[derive(Debug)]
pub struct ProvidersConfigBuilder {
    config: ProvidersConfig,
}

impl Default for ProvidersConfigBuilder {
    fn default() -> Self {
        Self {
            config: ProvidersConfig::empty(),
        }
    }
}

impl ProvidersConfigBuilder {
    /// Set the entry for a provider, replacing any existing one.
    pub fn provider(mut self, kind: ProviderKind, entry: ProviderEntry) -> Self {
        self.config.entries.insert(kind, entry);
        self
    }

    /// Configure the OpenAI provider.
    pub fn openai(self, api_key: impl Into<String>, models: &[&str]) -> Self {
        self.provider(
            ProviderKind::OpenAi,
            ProviderEntry {
                api_key: Some(api_key.into()),
                base_url: Some(DEFAULT_OPENAI_BASE_URL.to_string()),
                models: models.iter().map(|m| m.to_string()).collect(),
            },
        )
    }

    /// Configure the credential-free chat gateway.
    pub fn gateway(self, models: &[&str]) -> Self {
        self.provider(
            ProviderKind::Gateway,
            ProviderEntry {
                models: models.iter().map(|m| m.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    /// Configure the Pollinations provider.
    pub fn pollinations(self, base_url: impl Into<String>, models: &[&str]) -> Self {
        self.provider(
            ProviderKind::Pollinations,
            ProviderEntry {
                base_url: Some(base_url.into()),
                models: models.iter().map(|m| m.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    /// Build the configuration.
    pub fn build(self) -> ProvidersConfig {
        self.config
    }
}

/// Split a comma-separated model list, dropping blanks.
fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
