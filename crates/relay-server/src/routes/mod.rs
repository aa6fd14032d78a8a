//! Route handlers for the relay server.

pub mod health;
pub mod sms;

use axum::routing::{get, post};
use axum::Router;
use orchestrator::MessageSender;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router<S: MessageSender + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Twilio inbound-message webhook
        .route("/sms", post(sms::receive::<S>))
        // Health check
        .route("/health", get(health::health))
}
