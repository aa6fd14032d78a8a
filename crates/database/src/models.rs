//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A gateway address seen by the relay (a sender, or the relay itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Identity {
    /// Surrogate key.
    pub id: i64,
    /// Address, e.g. "+15551234567".
    pub address: String,
    /// First time the address was seen.
    pub created_at: String,
}

/// A recorded inbound or outbound transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Surrogate key; breaks ties between equal timestamps.
    pub id: i64,
    /// Gateway message identifier.
    pub external_id: String,
    /// Sender address.
    pub from_address: String,
    /// Recipient address.
    pub to_address: String,
    /// Message body (or media URL for media-only transmissions).
    pub body: String,
    /// Creation timestamp with millisecond precision.
    pub created_at: String,
}

/// The effective per-identity settings, with prompt and model resolved to
/// their values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Settings {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub stop_sequence: Option<String>,
    pub max_tokens: Option<i64>,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

/// A single-field settings change.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    Model(String),
    SystemPrompt(String),
    StopSequence(Option<String>),
    MaxTokens(Option<i64>),
    Temperature(f64),
    TopP(f64),
    FrequencyPenalty(f64),
    PresencePenalty(f64),
}
