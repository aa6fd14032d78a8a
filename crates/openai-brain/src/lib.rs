//! OpenAI provider for the TextGPT relay.
//!
//! [`OpenAiBrain`] implements both provider seams from `brain-core`:
//!
//! - [`Brain`] - chat completions with per-request sampling parameters, and
//!   the model list used to seed the relay's catalog
//! - [`ImageGenerator`] - image generation, edits (image + mask upload) and
//!   variations
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::{Brain, ChatMessage, OpenAiBrain, SamplingParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     let reply = brain
//!         .complete(
//!             &[ChatMessage::user("Say hi")],
//!             &SamplingParams::for_model("gpt-3.5-turbo"),
//!         )
//!         .await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, BrainError, ChatMessage, ImageGenerator, ImageSize, Role, SamplingParams,
};
