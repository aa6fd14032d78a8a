//! Types for sending messages via the Twilio API.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Form parameters for `POST .../Messages.json`.
///
/// Exactly one of `body` and `media_url` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendParams {
    /// Recipient number.
    pub to: String,

    /// Sender number. Filled from the client configuration when empty.
    pub from: String,

    /// The message text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Publicly reachable media to attach.
    #[serde(rename = "MediaUrl", skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl SendParams {
    /// Create send params for a text message.
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    /// Create send params for a media-only message.
    pub fn media(to: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            media_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Set the sender number.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Check that the message carries exactly one of body and media.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.to.is_empty() {
            return Err(GatewayError::InvalidMessage("missing recipient".to_string()));
        }
        match (&self.body, &self.media_url) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(GatewayError::InvalidMessage(
                "body and media are mutually exclusive".to_string(),
            )),
            (None, None) => Err(GatewayError::InvalidMessage(
                "either body or media is required".to_string(),
            )),
        }
    }
}

/// The created message resource, trimmed to what the relay uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendResult {
    /// Message SID, the gateway's identifier for the message.
    pub sid: String,

    /// Delivery status at creation time (usually "queued").
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned by the API on failure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}
