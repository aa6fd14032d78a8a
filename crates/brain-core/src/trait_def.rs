//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::{ChatMessage, SamplingParams};

/// A language-model provider.
///
/// Implementations range from scripted test doubles to HTTP clients.
/// This trait is object-safe and can be used with `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Run one chat completion and return the single completion text.
    ///
    /// # Arguments
    ///
    /// * `messages` - The ordered conversation, system entry first.
    /// * `params` - Model and sampling parameters.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<String, BrainError>;

    /// List the model identifiers the provider advertises.
    async fn list_models(&self) -> Result<Vec<String>, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;
}
