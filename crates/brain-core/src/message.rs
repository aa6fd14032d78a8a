//! Message types exchanged with the gateway and the LLM provider.

use serde::{Deserialize, Serialize};

/// Speaker role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged turn handed to the LLM provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for a chat completion.
///
/// Mirrors a sender's stored settings; `None` means "let the provider decide".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Model identifier.
    pub model: String,
    /// Stop sequence.
    pub stop: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
}

impl SamplingParams {
    /// Parameters for a model with every knob left to the provider.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            stop: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }
}

/// A message received from the SMS gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Gateway message identifier (e.g. a Twilio `MessageSid`).
    pub external_id: String,
    /// Sender address.
    pub from: String,
    /// Recipient address (the relay's own number).
    pub to: String,
    /// Message body.
    pub body: String,
    /// URL of the first attached media item, if any.
    pub media_url: Option<String>,
}

impl InboundMessage {
    /// Create a text-only inbound message.
    pub fn text(
        external_id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            from: from.into(),
            to: to.into(),
            body: body.into(),
            media_url: None,
        }
    }

    /// Attach a media URL.
    pub fn with_media(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }
}
