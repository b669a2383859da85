//! Error types for provider calls.

use thiserror::Error;

/// Errors that can occur while calling a text-generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider is missing required configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider rejected our credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status code.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider returned no text.
    #[error("empty response from provider")]
    EmptyResponse,
}

impl ProviderError {
    /// Classify a non-success HTTP status into an error.
    ///
    /// 401 and 403 are authentication failures, everything else keeps
    /// the status code and body for diagnosis.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => ProviderError::Authentication(format!("status {}: {}", status, body)),
            _ => ProviderError::Status { status, body },
        }
    }

    /// Whether this error is a configuration problem rather than a
    /// transient call failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(
            ProviderError::from_status(401, "bad key"),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_status(403, "forbidden"),
            ProviderError::Authentication(_)
        ));
    }

    #[test]
    fn test_from_status_other() {
        match ProviderError::from_status(503, "overloaded") {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[test]
    fn test_is_configuration() {
        assert!(ProviderError::Configuration("x".to_string()).is_configuration());
        assert!(!ProviderError::EmptyResponse.is_configuration());
    }
}
