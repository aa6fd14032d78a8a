//! Inbound message webhook payload.

use serde::Deserialize;

/// Form fields Twilio posts for an incoming SMS/MMS.
///
/// Only the first media item is surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundWebhook {
    #[serde(rename = "MessageSid")]
    pub message_sid: String,

    #[serde(rename = "From")]
    pub from: String,

    #[serde(rename = "To")]
    pub to: String,

    /// Text body; absent or empty for media-only messages.
    #[serde(rename = "Body", default)]
    pub body: String,

    /// URL of the first attached media item.
    #[serde(rename = "MediaUrl0", default)]
    pub media_url: Option<String>,
}

impl InboundWebhook {
    /// The attached media URL, ignoring empty values.
    pub fn media(&self) -> Option<&str> {
        self.media_url.as_deref().filter(|url| !url.is_empty())
    }
}
