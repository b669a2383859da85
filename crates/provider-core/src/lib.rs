//! Core trait and types for text-generation providers.
//!
//! This crate provides the shared interface for every provider adapter
//! used by the generation orchestrator. It defines:
//!
//! - [`TextProvider`] - The single-call capability every adapter implements
//! - [`ProviderError`] - Failure classification for adapter calls
//! - [`ProviderKind`] / [`ProviderEntry`] / [`ProvidersConfig`] - Static provider configuration
//! - [`hash_prompt`] - Stable fingerprints for logging prompts
//!
//! # Example
//!
//! ```rust
//! use provider_core::{async_trait, ProviderError, TextProvider};
//!
//! struct Shouting;
//!
//! #[async_trait]
//! impl TextProvider for Shouting {
//!     async fn complete(&self, _model: &str, prompt: &str) -> Result<String, ProviderError> {
//!         Ok(prompt.to_uppercase())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Shouting"
//!     }
//! }
//! ```

mod config;
mod error;
mod prompt;
mod trait_def;

pub use config::{ProviderEntry, ProviderKind, ProvidersConfig, ProvidersConfigBuilder};
pub use error::ProviderError;
pub use prompt::hash_prompt;
pub use trait_def::TextProvider;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
