//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use image_pipeline::PipelineError;
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Persistence failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Provider call failed.
    #[error("{0}")]
    Brain(#[from] BrainError),

    /// Image could not be made acceptable.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// A stored message belongs to neither the sender nor the relay.
    #[error("message {message_id} in the history of {sender} was sent by {origin}")]
    DataConsistency {
        sender: String,
        origin: String,
        message_id: i64,
    },

    /// A settings value could not be parsed for its field.
    #[error("{value} is not a valid value for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
