//! Scripted provider implementation - replays canned replies.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use provider_core::{async_trait, ProviderError, TextProvider};

/// A canned reply for [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Return this text.
    Text(String),
    /// Fail with a network error carrying this message.
    NetworkError(String),
    /// Fail with an authentication error.
    AuthError,
    /// Fail with an empty-response error.
    Empty,
}

impl ScriptedReply {
    /// Shorthand for a text reply.
    pub fn text(text: impl Into<String>) -> Self {
        ScriptedReply::Text(text.into())
    }

    fn to_result(&self) -> Result<String, ProviderError> {
        match self {
            ScriptedReply::Text(text) => Ok(text.clone()),
            ScriptedReply::NetworkError(msg) => Err(ProviderError::Network(msg.clone())),
            ScriptedReply::AuthError => {
                Err(ProviderError::Authentication("invalid credentials".to_string()))
            }
            ScriptedReply::Empty => Err(ProviderError::EmptyResponse),
        }
    }
}

/// A provider that replays a fixed sequence of replies.
///
/// Replies are consumed in order; once only one is left it is repeated
/// forever. Every call is counted and its prompt recorded, so tests can
/// assert on retry behavior.
#[derive(Debug)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider that replays `replies` in order.
    ///
    /// An empty sequence behaves like [`ScriptedReply::Empty`].
    pub fn sequence(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that always returns `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::sequence([ScriptedReply::Text(text.into())])
    }

    /// Create a provider whose every call fails with a network error.
    pub fn failing() -> Self {
        Self::sequence([ScriptedReply::NetworkError("connection refused".to_string())])
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> ScriptedReply {
        let Ok(mut replies) = self.replies.lock() else {
            return ScriptedReply::Empty;
        };

        if replies.len() > 1 {
            replies.pop_front().unwrap_or(ScriptedReply::Empty)
        } else {
            replies.front().cloned().unwrap_or(ScriptedReply::Empty)
        }
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    async fn complete(&self, _model: &str, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.next_reply().to_result()
    }

    fn name(&self) -> &str {
        "ScriptedProvider"
    }
}
