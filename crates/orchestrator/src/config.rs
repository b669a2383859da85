//! Provider selection for generation.

use std::env;
use std::sync::Arc;

use openai_provider::{GatewayProvider, OpenAiProvider};
use pollinations_provider::PollinationsProvider;
use provider_core::{ProviderEntry, ProviderError, ProviderKind, ProvidersConfig, TextProvider};

/// Default provider when `LLM_PROVIDER` is unset.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::OpenAi;

/// Which provider and model to generate with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub providers: ProvidersConfig,
}

impl GenerationConfig {
    /// Create a config with the given provider and model.
    pub fn new(provider: ProviderKind, model: impl Into<String>, providers: ProvidersConfig) -> Self {
        Self {
            provider,
            model: model.into(),
            providers,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `LLM_PROVIDER` - `openai`, `gateway` (alias `g4f`) or `pollinations` (default: openai)
    /// - `LLM_MODEL` - Model name (default: first permitted model of the provider)
    /// - Per-provider `<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL`, `<PREFIX>_MODELS`
    ///
    /// Fails only on an unknown provider name; missing credentials surface
    /// when the orchestrator validates the selection.
    pub fn from_env() -> Result<Self, ProviderError> {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(name) if !name.trim().is_empty() => name.parse()?,
            _ => DEFAULT_PROVIDER,
        };

        let providers = ProvidersConfig::from_env();

        let model = env::var("LLM_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| providers.models(provider).first().cloned())
            .unwrap_or_default();

        Ok(Self {
            provider,
            model,
            providers,
        })
    }

    /// Validate the selection and build its provider.
    pub fn build_provider(&self) -> Result<Arc<dyn TextProvider>, ProviderError> {
        let entry = self.providers.validate(self.provider, &self.model)?;
        build_provider(self.provider, entry)
    }
}

/// Build the adapter for `kind` from its configuration entry.
pub fn build_provider(
    kind: ProviderKind,
    entry: &ProviderEntry,
) -> Result<Arc<dyn TextProvider>, ProviderError> {
    Ok(match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::from_entry(entry)?),
        ProviderKind::Gateway => Arc::new(GatewayProvider::from_entry(entry)?),
        ProviderKind::Pollinations => Arc::new(PollinationsProvider::from_entry(entry)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_names() {
        let config = ProvidersConfig::builder()
            .openai("sk-test", &["gpt-4"])
            .gateway(&[])
            .pollinations("https://text.example/openai", &["openai-fast"])
            .build();

        for (kind, name) in [
            (ProviderKind::OpenAi, "openai"),
            (ProviderKind::Gateway, "gateway"),
            (ProviderKind::Pollinations, "pollinations"),
        ] {
            let entry = config.get(kind).unwrap();
            assert_eq!(build_provider(kind, entry).unwrap().name(), name);
        }
    }

    #[test]
    fn test_build_provider_missing_key() {
        let config = GenerationConfig::new(ProviderKind::OpenAi, "gpt-4", ProvidersConfig::default());
        assert!(matches!(
            config.build_provider(),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_llm_vars() {
            std::env::remove_var("LLM_PROVIDER");
            std::env::remove_var("LLM_MODEL");
            for prefix in ["OPENAI", "GATEWAY", "POLLINATIONS"] {
                for suffix in ["API_KEY", "BASE_URL", "MODELS"] {
                    std::env::remove_var(format!("{}_{}", prefix, suffix));
                }
            }
        }

        // Scenario 1: defaults pick openai and its first model
        clear_all_llm_vars();
        let config = GenerationConfig::from_env().unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-3.5-turbo");

        // Scenario 2: legacy provider alias and explicit model
        clear_all_llm_vars();
        std::env::set_var("LLM_PROVIDER", "g4f");
        std::env::set_var("LLM_MODEL", "gpt-4");
        let config = GenerationConfig::from_env().unwrap();
        assert_eq!(config.provider, ProviderKind::Gateway);
        assert_eq!(config.model, "gpt-4");
        assert!(config.build_provider().is_ok());

        // Scenario 3: unknown provider
        clear_all_llm_vars();
        std::env::set_var("LLM_PROVIDER", "azure");
        assert!(matches!(
            GenerationConfig::from_env(),
            Err(ProviderError::Configuration(msg)) if msg.contains("azure")
        ));

        clear_all_llm_vars();
    }
}
