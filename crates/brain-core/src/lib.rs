//! Core traits and types shared by the TextGPT relay crates.
//!
//! This crate defines the provider seams the relay talks to:
//!
//! - [`Brain`] - chat completion and model listing (the LLM provider)
//! - [`ImageGenerator`] - image creation, editing and variations
//! - [`ChatMessage`] / [`Role`] / [`SamplingParams`] - what a completion is built from
//! - [`InboundMessage`] - one message received from the SMS gateway
//! - [`BrainError`] - provider failures
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, Brain, BrainError, ChatMessage, SamplingParams};
//!
//! struct Parrot;
//!
//! #[async_trait]
//! impl Brain for Parrot {
//!     async fn complete(
//!         &self,
//!         messages: &[ChatMessage],
//!         _params: &SamplingParams,
//!     ) -> Result<String, BrainError> {
//!         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
//!     }
//!
//!     async fn list_models(&self) -> Result<Vec<String>, BrainError> {
//!         Ok(vec!["parrot-1".to_string()])
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Parrot"
//!     }
//! }
//! ```

mod error;
mod image;
mod message;
mod trait_def;

pub use error::BrainError;
pub use image::{ImageGenerator, ImageSize};
pub use message::{ChatMessage, InboundMessage, Role, SamplingParams};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
