//! Echo provider implementation - returns the prompt.

use provider_core::{async_trait, ProviderError, TextProvider};

/// A provider that returns the prompt it was given.
///
/// Useful for checking prompt construction end to end.
#[derive(Debug, Clone, Default)]
pub struct EchoProvider {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoProvider {
    /// Create a new EchoProvider with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoProvider with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl TextProvider for EchoProvider {
    async fn complete(&self, _model: &str, prompt: &str) -> Result<String, ProviderError> {
        if prompt.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, prompt),
            None => prompt.to_string(),
        })
    }

    fn name(&self) -> &str {
        "EchoProvider"
    }
}
