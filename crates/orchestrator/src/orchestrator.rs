//! Generation orchestrator with layered retry.

use std::sync::Arc;

use provider_core::{hash_prompt, ProviderError, ProviderKind, ProvidersConfig, TextProvider};
use tracing::{debug, error, info, warn};

use crate::config::GenerationConfig;
use crate::error::OrchestratorError;
use crate::generation::Generation;
use crate::retry::RetryPolicy;
use crate::script::{script_prompt, validate_script};
use crate::terms::{parse_terms, terms_prompt};

const SCRIPT_OPERATION: &str = "generate_script";
const TERMS_OPERATION: &str = "generate_terms";

/// Generates narration scripts and stock-footage search terms.
///
/// Every generation runs two nested retry loops:
///
/// ```text
/// semantic attempt 1..=5
///   └─ transport attempt 1..=3  (provider call, 2s apart)
///        ↓ reply
///      validate (clean script / parse terms)
///        ├─ ok        → Succeeded
///        └─ rejected  → next semantic attempt
/// all semantic attempts used → Exhausted, empty value
/// ```
///
/// The provider configuration is checked before the first call. A
/// configuration problem is returned as an error and consumes no attempts.
/// Transport and validation failures never escape; inspect the returned
/// [`Generation`] instead.
pub struct GenerationOrchestrator {
    provider: Arc<dyn TextProvider>,
    kind: ProviderKind,
    model: String,
    providers: ProvidersConfig,
    transport: RetryPolicy,
    semantic: RetryPolicy,
}

impl GenerationOrchestrator {
    /// Create an orchestrator around an existing provider.
    ///
    /// `kind` and `providers` decide which configuration fields are required.
    pub fn new(
        provider: Arc<dyn TextProvider>,
        kind: ProviderKind,
        model: impl Into<String>,
        providers: ProvidersConfig,
    ) -> Self {
        Self {
            provider,
            kind,
            model: model.into(),
            providers,
            transport: RetryPolicy::transport(),
            semantic: RetryPolicy::semantic(),
        }
    }

    /// Create an orchestrator, building the provider from configuration.
    pub fn from_config(config: GenerationConfig) -> Result<Self, OrchestratorError> {
        let provider = config.build_provider()?;
        Ok(Self::new(
            provider,
            config.provider,
            config.model,
            config.providers,
        ))
    }

    /// Create an orchestrator from environment variables.
    ///
    /// See [`GenerationConfig::from_env`].
    pub fn from_env() -> Result<Self, OrchestratorError> {
        Self::from_config(GenerationConfig::from_env()?)
    }

    /// Replace the per-call retry policy.
    pub fn with_transport_policy(mut self, policy: RetryPolicy) -> Self {
        self.transport = policy;
        self
    }

    /// Replace the whole-generation retry policy.
    pub fn with_semantic_policy(mut self, policy: RetryPolicy) -> Self {
        self.semantic = policy;
        self
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport_policy(&self) -> RetryPolicy {
        self.transport
    }

    pub fn semantic_policy(&self) -> RetryPolicy {
        self.semantic
    }

    /// Generate a narration script for `subject`.
    ///
    /// `language` may be empty to let the provider follow the subject's
    /// language. On exhaustion the value is an empty string.
    pub async fn generate_script(
        &self,
        subject: &str,
        language: &str,
        paragraph_number: u32,
    ) -> Result<Generation<String>, OrchestratorError> {
        info!(subject = %subject, paragraph_number, "Generating script");
        let prompt = script_prompt(subject, language, paragraph_number);
        self.generate(SCRIPT_OPERATION, &prompt, validate_script).await
    }

    /// Generate stock-footage search terms for a subject and its script.
    ///
    /// `amount` shapes the prompt only; the reply may hold more or fewer
    /// terms. On exhaustion the value is an empty list.
    pub async fn generate_terms(
        &self,
        subject: &str,
        script: &str,
        amount: u32,
    ) -> Result<Generation<Vec<String>>, OrchestratorError> {
        info!(subject = %subject, amount, "Generating search terms");
        let prompt = terms_prompt(subject, script, amount);
        self.generate(TERMS_OPERATION, &prompt, parse_terms).await
    }

    /// Semantic layer: repeat whole generations until one validates.
    async fn generate<T, F>(
        &self,
        operation: &'static str,
        prompt: &str,
        validate: F,
    ) -> Result<Generation<T>, OrchestratorError>
    where
        T: Default,
        F: Fn(&str) -> Result<T, OrchestratorError>,
    {
        self.check_config()?;

        let prompt_hash = hash_prompt(prompt);
        let max_attempts = self.semantic.max_attempts();
        debug!(
            operation,
            provider = %self.kind,
            model = %self.model,
            prompt_hash = &prompt_hash[..12],
            "Starting generation"
        );

        for attempt in 1..=max_attempts {
            let outcome = match self.call_provider(prompt).await {
                Ok(raw) => validate(&raw),
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => {
                    info!(operation, attempt, provider = %self.kind, "Generation succeeded");
                    return Ok(Generation::succeeded(operation, value, attempt));
                }
                Err(e) => {
                    warn!(
                        operation,
                        provider = %self.kind,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Generation attempt failed"
                    );
                }
            }

            if self.semantic.should_retry(attempt) {
                self.semantic.pause().await;
            }
        }

        error!(
            operation,
            attempts = max_attempts,
            provider = %self.kind,
            "Generation exhausted all attempts"
        );
        Ok(Generation::exhausted(operation, max_attempts))
    }

    /// Transport layer: one provider call, retried on failure.
    async fn call_provider(&self, prompt: &str) -> Result<String, OrchestratorError> {
        let max_attempts = self.transport.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match self.provider.complete(&self.model, prompt).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => ProviderError::EmptyResponse,
                Err(ProviderError::Configuration(msg)) => {
                    return Err(OrchestratorError::Configuration(msg))
                }
                Err(e) => e,
            };

            warn!(
                provider = %self.kind,
                adapter = self.provider.name(),
                attempt,
                max_attempts,
                error = %err,
                "Provider call failed"
            );

            if !self.transport.should_retry(attempt) {
                return Err(OrchestratorError::TransportExhausted {
                    provider: self.kind.to_string(),
                    attempts: attempt,
                    source: err,
                });
            }
            self.transport.pause().await;
        }
    }

    fn check_config(&self) -> Result<(), OrchestratorError> {
        self.providers
            .validate(self.kind, &self.model)
            .map(|_| ())
            .map_err(|e| {
                error!(provider = %self.kind, error = %e, "Invalid provider configuration");
                OrchestratorError::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_provider::{EchoProvider, ScriptedProvider, ScriptedReply};
    use std::time::Duration;

    fn gateway_config() -> ProvidersConfig {
        ProvidersConfig::builder().gateway(&[]).build()
    }

    fn orchestrator(provider: Arc<dyn TextProvider>) -> GenerationOrchestrator {
        GenerationOrchestrator::new(provider, ProviderKind::Gateway, "test-model", gateway_config())
            .with_transport_policy(RetryPolicy::transport().without_delay())
    }

    #[tokio::test]
    async fn test_transport_retry_recovers() {
        let provider = Arc::new(ScriptedProvider::sequence([
            ScriptedReply::NetworkError("reset".to_string()),
            ScriptedReply::Empty,
            ScriptedReply::text("Recovered script"),
        ]));
        let orchestrator = orchestrator(provider.clone());

        let generation = orchestrator.generate_script("topic", "", 1).await.unwrap();
        assert!(generation.is_success());
        assert_eq!(generation.attempts, 1);
        assert_eq!(generation.value, "Recovered script");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_call_provider_exhaustion_reports_provider() {
        let provider = Arc::new(ScriptedProvider::failing());
        let orchestrator = orchestrator(provider.clone());

        let err = orchestrator.call_provider("prompt").await.unwrap_err();
        match err {
            OrchestratorError::TransportExhausted {
                provider: name,
                attempts,
                source,
            } => {
                assert_eq!(name, "gateway");
                assert_eq!(attempts, 3);
                assert!(matches!(source, ProviderError::Network(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_transport_failure() {
        let provider = Arc::new(ScriptedProvider::always("   \n "));
        let orchestrator = orchestrator(provider.clone());

        let err = orchestrator.call_provider("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::TransportExhausted {
                source: ProviderError::EmptyResponse,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_adapter_configuration_error_is_not_retried() {
        struct Misconfigured;

        #[provider_core::async_trait]
        impl TextProvider for Misconfigured {
            async fn complete(&self, _model: &str, _prompt: &str) -> Result<String, ProviderError> {
                Err(ProviderError::Configuration("bad base url".to_string()))
            }

            fn name(&self) -> &str {
                "Misconfigured"
            }
        }

        let orchestrator = orchestrator(Arc::new(Misconfigured));
        let err = orchestrator.generate_script("topic", "", 1).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_prompt_reaches_provider() {
        let orchestrator = orchestrator(Arc::new(EchoProvider::new()));
        let generation = orchestrator
            .generate_script("Deep sea creatures", "fr-FR", 3)
            .await
            .unwrap();

        // Echoed prompt survives cleanup minus its markdown markers
        assert!(generation.value.contains("video subject: Deep sea creatures"));
        assert!(generation.value.contains("- language: fr-FR"));
        assert!(!generation.value.contains('#'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_transport_delay() {
        let provider = Arc::new(ScriptedProvider::sequence([
            ScriptedReply::NetworkError("down".to_string()),
            ScriptedReply::NetworkError("down".to_string()),
            ScriptedReply::text("finally"),
        ]));
        let orchestrator =
            GenerationOrchestrator::new(provider.clone(), ProviderKind::Gateway, "m", gateway_config());

        let start = tokio::time::Instant::now();
        let generation = orchestrator.generate_script("topic", "", 1).await.unwrap();

        assert_eq!(generation.value, "finally");
        assert_eq!(provider.calls(), 3);
        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[test]
    fn test_accessors() {
        let orchestrator = orchestrator(Arc::new(EchoProvider::new()));
        assert_eq!(orchestrator.provider_kind(), ProviderKind::Gateway);
        assert_eq!(orchestrator.model(), "test-model");
        assert_eq!(orchestrator.transport_policy().max_attempts(), 3);
        assert_eq!(orchestrator.semantic_policy(), RetryPolicy::semantic());
    }
}
