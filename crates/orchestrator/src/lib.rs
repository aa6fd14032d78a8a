//! Message orchestrator for the TextGPT SMS relay.
//!
//! This crate provides the [`Orchestrator`] type which turns one inbound SMS
//! into a reply: it records the message, resolves the sender's settings,
//! routes to the `#`-command interpreter or to a provider completion, and
//! sends the reply back in gateway-sized chunks.
//!
//! # Architecture
//!
//! ```text
//! Inbound SMS (from the webhook)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Record inbound message                                  │
//! │         ↓                                                   │
//! │  2. Resolve settings (defaults on first contact)            │
//! │         ↓                                                   │
//! │  3. Route:                                                  │
//! │     • "#..." → CommandInterpreter (get/set/reset/image...)  │
//! │     • text   → build turn from history → Brain::complete    │
//! │         ↓                                                   │
//! │  4. Split reply into chunks (URLs go out as media)          │
//! │         ↓                                                   │
//! │  5. Send + record each chunk                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use database::Database;
//! use image_pipeline::HttpImageFetcher;
//! use mock_brain::{EchoBrain, RecordingImageGenerator};
//! use orchestrator::{
//!     InboundMessage, LoggingSender, NoUsageLimits, Orchestrator, OrchestratorConfig, Providers,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::in_memory().await?;
//!     let providers = Providers {
//!         brain: Arc::new(EchoBrain::new()),
//!         images: Arc::new(RecordingImageGenerator::new("https://example.com/a.png")),
//!         fetcher: Arc::new(HttpImageFetcher::new()),
//!         limits: Arc::new(NoUsageLimits),
//!     };
//!     let config = OrchestratorConfig::new("+15550000000");
//!     let orchestrator = Orchestrator::start(db, config, providers, LoggingSender::default()).await?;
//!
//!     let message = InboundMessage::text("SM1", "+15551234567", "+15550000000", "#help");
//!     let outcome = orchestrator.process(message).await?;
//!     println!("Reply: {}", outcome.reply);
//!     Ok(())
//! }
//! ```

mod catalog;
mod chunking;
mod commands;
mod conversation;
mod error;
mod limits;
mod orchestrator;
mod sender;
mod settings;

// Public exports
pub use catalog::ModelCatalog;
pub use chunking::{is_bare_url, split_reply, ReplyChunk, DEFAULT_CHUNK_SIZE};
pub use commands::{
    error_reply, is_command, Command, CommandInterpreter, ImageAction, ResetScope, UnknownCommand,
    Verb, COMMAND_MARKER, HELP_TEXT,
};
pub use conversation::{assemble, build_turn};
pub use error::{OrchestratorError, Result};
pub use limits::{NoUsageLimits, UsageLimits};
pub use orchestrator::{prepare_store, DispatchOutcome, Orchestrator, OrchestratorConfig, Providers};
pub use sender::{LoggingSender, MessageSender, NoOpSender};
pub use settings::{
    sampling_params, SettingField, SettingsDefaults, SettingsResolver, DEFAULT_MODEL,
    DEFAULT_SYSTEM_PROMPT,
};

// Re-export commonly used types from dependencies
pub use brain_core::InboundMessage;
