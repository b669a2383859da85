//! OpenAI-style chat completion providers.
//!
//! This crate provides two [`TextProvider`] implementations that speak the
//! chat completions protocol:
//!
//! - [`OpenAiProvider`] - the OpenAI API, authenticated with a bearer key
//! - [`GatewayProvider`] - a free-form chat gateway that needs no credentials
//!   and may answer with either a chat completion body or plain text
//!
//! Both send the prompt as a single user message and never retry.
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_provider::{OpenAiProvider, OpenAiProviderConfig};
//! use provider_core::TextProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAiProviderConfig::builder().api_key("sk-...").build();
//!     let provider = OpenAiProvider::new(config)?;
//!     let text = provider.complete("gpt-4", "Say hello").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod client;
mod config;
mod gateway;
mod provider;

pub use config::{OpenAiProviderConfig, OpenAiProviderConfigBuilder, DEFAULT_GATEWAY_BASE_URL};
pub use gateway::GatewayProvider;
pub use provider::OpenAiProvider;

// Re-export provider-core types for convenience
pub use provider_core::{async_trait, ProviderError, TextProvider};
