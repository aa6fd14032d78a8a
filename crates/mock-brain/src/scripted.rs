//! Scripted brain implementation - replies from a queue.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use brain_core::{Brain, BrainError, ChatMessage, SamplingParams};

use crate::CompletionCall;

/// A brain that answers each call with the next queued result.
///
/// Once the queue is empty every call fails with `BrainError::Unavailable`.
#[derive(Debug, Default)]
pub struct ScriptedBrain {
    replies: Mutex<VecDeque<Result<String, BrainError>>>,
    models: Option<Vec<String>>,
    calls: Mutex<Vec<CompletionCall>>,
}

impl ScriptedBrain {
    /// Create a brain with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a brain that answers with each reply in turn.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: BrainError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Advertise the given model names. Without this `list_models` fails.
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = Some(models.into_iter().map(Into::into).collect());
        self
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<String, BrainError> {
        self.calls.lock().await.push(CompletionCall {
            messages: messages.to_vec(),
            params: params.clone(),
        });

        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(BrainError::Unavailable("script exhausted".to_string())))
    }

    async fn list_models(&self) -> Result<Vec<String>, BrainError> {
        self.models
            .clone()
            .ok_or_else(|| BrainError::Unavailable("model listing not scripted".to_string()))
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
