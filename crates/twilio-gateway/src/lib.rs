//! Twilio messaging client library.
//!
//! This crate provides a Rust client for the Twilio Programmable Messaging
//! REST API and the payload Twilio posts to an inbound-message webhook. It
//! supports:
//!
//! - Sending a text body or a single media URL from the configured number
//! - Decoding the form fields of an inbound SMS/MMS webhook
//!
//! # Example
//!
//! ```no_run
//! use twilio_gateway::{GatewayConfig, TwilioClient};
//!
//! # async fn example() -> Result<(), twilio_gateway::GatewayError> {
//! let config = GatewayConfig::from_env()?;
//! let client = TwilioClient::new(config)?;
//!
//! let result = client.send_text("+15551234567", "Hello!").await?;
//! println!("Queued as {}", result.sid);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::TwilioClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
