//! Error types for generation operations.

use provider_core::ProviderError;
use thiserror::Error;

/// Errors that can occur during generation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The selected provider cannot be called as configured.
    ///
    /// Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Every transport attempt against the provider failed.
    #[error("provider '{provider}' failed after {attempts} attempts: {source}")]
    TransportExhausted {
        provider: String,
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    /// A single provider call failed outside the retry loop.
    #[error("provider error: {0}")]
    Provider(#[source] ProviderError),

    /// The provider replied, but the reply is not usable.
    #[error("invalid output: {0}")]
    Validation(String),

    /// Every semantic attempt failed.
    #[error("{operation} failed after {attempts} attempts")]
    ExhaustedRetries {
        operation: &'static str,
        attempts: u32,
    },
}

impl OrchestratorError {
    /// Whether this error is a configuration problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OrchestratorError::Configuration(_))
    }
}

impl From<ProviderError> for OrchestratorError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Configuration(msg) => OrchestratorError::Configuration(msg),
            other => OrchestratorError::Provider(other),
        }
    }
}
