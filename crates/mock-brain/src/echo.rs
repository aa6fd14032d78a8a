//! Echo brain implementation - echoes the latest user message back.

use async_trait::async_trait;
use tokio::sync::Mutex;

use brain_core::{Brain, BrainError, ChatMessage, Role, SamplingParams};

use crate::CompletionCall;

/// A simple brain that echoes the latest user message.
///
/// Useful for testing the message flow without any AI processing.
#[derive(Debug, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
    models: Vec<String>,
    calls: Mutex<Vec<CompletionCall>>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoBrain;
    ///
    /// let brain = EchoBrain::with_prefix("Echo: ");
    /// // Will respond with "Echo: <latest user message>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Advertise the given model names from `list_models`.
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<String, BrainError> {
        self.calls.lock().await.push(CompletionCall {
            messages: messages.to_vec(),
            params: params.clone(),
        });

        let text = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, text),
            None => text.to_string(),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, BrainError> {
        Ok(self.models.clone())
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}
