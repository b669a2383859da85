//! Script and search-term generation over text providers.
//!
//! This crate provides [`GenerationOrchestrator`], which turns a video
//! subject into a cleaned narration script and a list of stock-footage
//! search terms using whichever provider the configuration selects.
//!
//! # Retry layers
//!
//! - **Transport**: each provider call is retried up to 3 times, 2 seconds
//!   apart ([`RetryPolicy::transport`]).
//! - **Semantic**: a whole generation (prompt, call, validation) is retried
//!   up to 5 times when the call fails or the reply is unusable
//!   ([`RetryPolicy::semantic`]).
//!
//! Only configuration problems are returned as errors. Everything else
//! ends in a [`Generation`] whose status says whether a value was produced.
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::GenerationOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = GenerationOrchestrator::from_env()?;
//!
//!     let script = orchestrator
//!         .generate_script("Why cats purr", "en-US", 2)
//!         .await?
//!         .into_result()?;
//!     let terms = orchestrator
//!         .generate_terms("Why cats purr", &script, 5)
//!         .await?
//!         .into_value();
//!
//!     println!("{}\n{:?}", script, terms);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod generation;
mod orchestrator;
mod retry;
mod script;
mod terms;

pub use config::{build_provider, GenerationConfig, DEFAULT_PROVIDER};
pub use error::OrchestratorError;
pub use generation::{Generation, GenerationStatus};
pub use orchestrator::GenerationOrchestrator;
pub use retry::RetryPolicy;
pub use script::{clean_script, script_prompt, validate_script, QUOTA_EXHAUSTED_MARKER};
pub use terms::{parse_terms, terms_prompt, GATEWAY_ERROR_MARKER};

// Re-export provider types callers need to build an orchestrator
pub use provider_core::{ProviderEntry, ProviderError, ProviderKind, ProvidersConfig, TextProvider};
