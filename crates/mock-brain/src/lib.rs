//! Mock provider implementations for TextGPT relay testing.
//!
//! This crate provides test doubles for the `brain-core` provider seams:
//! - `EchoBrain` - Replies with the latest user message
//! - `ScriptedBrain` - Replies from a queue of canned results
//! - `RecordingImageGenerator` - Returns a fixed URL and records each request
//!
//! Every double records the calls it receives so tests can assert on the
//! exact conversation and parameters that reached the provider.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, ChatMessage, EchoBrain, SamplingParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = EchoBrain::new();
//!
//!     let messages = [ChatMessage::system("Be brief."), ChatMessage::user("Hello!")];
//!     let reply = brain.complete(&messages, &SamplingParams::for_model("echo")).await?;
//!     assert_eq!(reply, "Hello!");
//!     Ok(())
//! }
//! ```

mod echo;
mod images;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, BrainError, ChatMessage, ImageGenerator, ImageSize, Role, SamplingParams,
};

pub use echo::EchoBrain;
pub use images::{ImageCall, RecordingImageGenerator};
pub use scripted::ScriptedBrain;

/// One recorded `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCall {
    pub messages: Vec<ChatMessage>,
    pub params: SamplingParams,
}
