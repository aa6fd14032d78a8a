//! Error types for twilio-gateway.

use thiserror::Error;

/// Errors that can occur when talking to the Twilio API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Twilio rejected the request.
    #[error("Twilio API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The message is not sendable as built.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}
