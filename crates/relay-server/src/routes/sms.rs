//! Inbound SMS webhook.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use orchestrator::{InboundMessage, MessageSender};
use tracing::info;
use twilio_gateway::InboundWebhook;

use crate::error::Result;
use crate::state::AppState;

/// Convert a webhook payload into an orchestrator message.
pub fn webhook_to_inbound(webhook: &InboundWebhook) -> InboundMessage {
    let inbound = InboundMessage::text(
        &webhook.message_sid,
        &webhook.from,
        &webhook.to,
        &webhook.body,
    );
    match webhook.media() {
        Some(url) => inbound.with_media(url),
        None => inbound,
    }
}

/// Run one dispatch to completion, then answer with an empty body.
///
/// Replies go out through the REST API, not as TwiML.
pub async fn receive<S: MessageSender + 'static>(
    State(state): State<AppState<S>>,
    Form(webhook): Form<InboundWebhook>,
) -> Result<StatusCode> {
    info!("Webhook {} from {}", webhook.message_sid, webhook.from);

    let outcome = state
        .orchestrator
        .process(webhook_to_inbound(&webhook))
        .await?;

    info!(
        "Dispatched {}: {} sent, {} failed",
        webhook.message_sid, outcome.chunks_sent, outcome.chunks_failed
    );
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use database::{message, Database};
    use image_pipeline::HttpImageFetcher;
    use mock_brain::{EchoBrain, RecordingImageGenerator};
    use orchestrator::{NoOpSender, NoUsageLimits, Orchestrator, OrchestratorConfig, Providers};

    use super::*;

    const RELAY: &str = "+15550000000";

    fn webhook(sid: &str, body: &str, media: Option<&str>) -> InboundWebhook {
        InboundWebhook {
            message_sid: sid.to_string(),
            from: "+15551234567".to_string(),
            to: RELAY.to_string(),
            body: body.to_string(),
            media_url: media.map(str::to_string),
        }
    }

    async fn state() -> (Database, AppState<NoOpSender>) {
        let db = Database::in_memory().await.unwrap();
        let providers = Providers {
            brain: Arc::new(EchoBrain::new()),
            images: Arc::new(RecordingImageGenerator::new("https://example.com/a.png")),
            fetcher: Arc::new(HttpImageFetcher::new()),
            limits: Arc::new(NoUsageLimits),
        };
        let orchestrator = Orchestrator::start(
            db.clone(),
            OrchestratorConfig::new(RELAY),
            providers,
            NoOpSender::default(),
        )
        .await
        .unwrap();
        (db, AppState::new(orchestrator))
    }

    #[test]
    fn test_webhook_to_inbound() {
        let inbound = webhook_to_inbound(&webhook("SM1", "hello", None));
        assert_eq!(inbound.external_id, "SM1");
        assert_eq!(inbound.to, RELAY);
        assert_eq!(inbound.body, "hello");
        assert!(inbound.media_url.is_none());

        let inbound = webhook_to_inbound(&webhook("SM2", "", Some("https://m.example/1")));
        assert_eq!(inbound.media_url.as_deref(), Some("https://m.example/1"));

        let inbound = webhook_to_inbound(&webhook("SM3", "hi", Some("")));
        assert!(inbound.media_url.is_none());
    }

    #[tokio::test]
    async fn test_receive_records_exchange() {
        let (db, state) = state().await;

        let status = receive(State(state), Form(webhook("SM1", "hello", None)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);

        let history = message::list_messages_for(db.pool(), "+15551234567")
            .await
            .unwrap();
        let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["hello", "hello"]);
        assert_eq!(history[1].from_address, RELAY);
    }
}
