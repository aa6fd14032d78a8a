//! Delivers reply chunks through the Twilio REST API.

use async_trait::async_trait;
use orchestrator::{MessageSender, OrchestratorError, ReplyChunk};
use tracing::debug;
use twilio_gateway::TwilioClient;

/// [`MessageSender`] backed by a [`TwilioClient`].
#[derive(Debug, Clone)]
pub struct TwilioSender {
    client: TwilioClient,
}

impl TwilioSender {
    pub fn new(client: TwilioClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send(&self, recipient: &str, chunk: &ReplyChunk) -> Result<String, OrchestratorError> {
        let result = match chunk {
            ReplyChunk::Text(text) => self.client.send_text(recipient, text.as_str()).await,
            ReplyChunk::Media(url) => self.client.send_media(recipient, url.as_str()).await,
        }
        .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;

        debug!("Chunk for {} accepted as {}", recipient, result.sid);
        Ok(result.sid)
    }
}
