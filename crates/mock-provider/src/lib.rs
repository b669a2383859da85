//! Mock text providers for exercising generation logic without a network.
//!
//! This crate provides mock implementations of the `TextProvider` trait:
//! - `EchoProvider` - Returns the prompt, optionally prefixed
//! - `ScriptedProvider` - Replays a fixed sequence of replies and counts calls
//! - `DelayedProvider` - Wraps another provider with artificial latency
//!
//! # Example
//!
//! ```rust
//! use mock_provider::{ScriptedProvider, TextProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = ScriptedProvider::always(r#"["cats","dogs"]"#);
//!
//!     let text = provider.complete("any-model", "give me terms").await.unwrap();
//!     assert_eq!(text, r#"["cats","dogs"]"#);
//!     assert_eq!(provider.calls(), 1);
//! }
//! ```

mod delayed;
mod echo;
mod scripted;

// Re-export provider-core types for convenience
pub use provider_core::{async_trait, ProviderError, TextProvider};

// Export mock implementations
pub use delayed::DelayedProvider;
pub use echo::EchoProvider;
pub use scripted::{ScriptedProvider, ScriptedReply};
