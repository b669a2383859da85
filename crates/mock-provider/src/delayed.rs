//! Delayed provider implementation - wraps another provider with artificial delay.

use std::time::Duration;

use provider_core::{async_trait, ProviderError, TextProvider};
use tokio::time::sleep;

/// A provider that wraps another provider and adds artificial delay.
///
/// Useful for testing caller-imposed timeouts and simulating model latency.
pub struct DelayedProvider<P: TextProvider> {
    inner: P,
    delay: Duration,
}

impl<P: TextProvider> DelayedProvider<P> {
    /// Create a new DelayedProvider wrapping the given provider with the specified delay.
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a provider with a delay in milliseconds.
    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Create a provider with a delay in seconds.
    pub fn with_secs(inner: P, secs: u64) -> Self {
        Self::new(inner, Duration::from_secs(secs))
    }

    /// Get the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: TextProvider> TextProvider for DelayedProvider<P> {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        sleep(self.delay).await;
        self.inner.complete(model, prompt).await
    }

    fn name(&self) -> &str {
        "DelayedProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoProvider;

    #[tokio::test(start_paused = true)]
    async fn test_delayed_provider() {
        let provider = DelayedProvider::with_millis(EchoProvider::new(), 100);

        let start = tokio::time::Instant::now();
        let text = provider.complete("m", "test").await.unwrap();

        assert_eq!(text, "test");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_around_delayed_provider() {
        let provider = DelayedProvider::with_secs(EchoProvider::new(), 60);
        let result =
            tokio::time::timeout(Duration::from_secs(1), provider.complete("m", "test")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_name() {
        let provider = DelayedProvider::with_millis(EchoProvider::new(), 0);
        assert_eq!(provider.name(), "DelayedProvider");
    }
}
