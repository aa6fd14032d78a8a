//! Message sender trait and implementations.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::chunking::ReplyChunk;
use crate::error::OrchestratorError;

/// Trait for sending outbound transmissions.
///
/// Abstracted to support different transports (Twilio, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send one chunk to `recipient`.
    ///
    /// Text chunks go out as a message body, media chunks as an attachment
    /// with no body. Returns the gateway's identifier for the transmission.
    async fn send(&self, recipient: &str, chunk: &ReplyChunk) -> Result<String, OrchestratorError>;
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Default)]
pub struct NoOpSender {
    next_id: AtomicU64,
}

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send(&self, _recipient: &str, _chunk: &ReplyChunk) -> Result<String, OrchestratorError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("noop-{}", id))
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Default)]
pub struct LoggingSender {
    next_id: AtomicU64,
}

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send(&self, recipient: &str, chunk: &ReplyChunk) -> Result<String, OrchestratorError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        match chunk {
            ReplyChunk::Text(text) => tracing::info!("[text] Sending to {}: {}", recipient, text),
            ReplyChunk::Media(url) => tracing::info!("[media] Sending to {}: {}", recipient, url),
        }
        Ok(format!("log-{}", id))
    }
}
