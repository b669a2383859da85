//! Outcome of a generation call.

use crate::error::OrchestratorError;

/// Whether a generation produced a validated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// A validated value was produced.
    Succeeded,
    /// Every attempt failed; the value is the empty fallback.
    Exhausted,
}

/// Value returned by a generation call, with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation<T> {
    pub value: T,
    /// Semantic attempts used.
    pub attempts: u32,
    pub status: GenerationStatus,
    /// Name of the operation that produced this, for error reporting.
    pub operation: &'static str,
}

impl<T> Generation<T> {
    pub(crate) fn succeeded(operation: &'static str, value: T, attempts: u32) -> Self {
        Self {
            value,
            attempts,
            status: GenerationStatus::Succeeded,
            operation,
        }
    }

    pub(crate) fn exhausted(operation: &'static str, attempts: u32) -> Self
    where
        T: Default,
    {
        Self {
            value: T::default(),
            attempts,
            status: GenerationStatus::Exhausted,
            operation,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == GenerationStatus::Succeeded
    }

    /// Take the value; empty when every attempt failed.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Take the value, turning exhaustion into an error.
    pub fn into_result(self) -> Result<T, OrchestratorError> {
        match self.status {
            GenerationStatus::Succeeded => Ok(self.value),
            GenerationStatus::Exhausted => Err(OrchestratorError::ExhaustedRetries {
                operation: self.operation,
                attempts: self.attempts,
            }),
        }
    }
}
