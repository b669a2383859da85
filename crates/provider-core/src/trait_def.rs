//! The TextProvider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;

/// A single text-generation capability.
///
/// Implementations wrap exactly one external call and must not retry.
/// This trait is object-safe and can be used with `Arc<dyn TextProvider>`.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Complete a prompt with the given model.
    ///
    /// # Arguments
    ///
    /// * `model` - Model identifier understood by the provider.
    /// * `prompt` - The full prompt, sent as a single user message.
    ///
    /// # Returns
    ///
    /// The generated text, or a [`ProviderError`] on authentication failure,
    /// network failure, non-2xx response, or empty output.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Get a human-readable name for this provider.
    fn name(&self) -> &str;
}
