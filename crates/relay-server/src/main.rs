//! Webhook server for the TextGPT SMS relay.
//!
//! Receives Twilio inbound-message webhooks, runs each through the
//! orchestrator and replies via the Twilio REST API.

mod config;
mod error;
mod routes;
mod sender;
mod state;

use std::sync::Arc;

use database::Database;
use image_pipeline::HttpImageFetcher;
use openai_brain::OpenAiBrain;
use orchestrator::{NoUsageLimits, Orchestrator, OrchestratorConfig, Providers};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twilio_gateway::{GatewayConfig, TwilioClient};

use crate::config::Config;
use crate::sender::TwilioSender;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let gateway_config = GatewayConfig::from_env()?;
    info!(addr = %config.addr, number = %gateway_config.phone_number, "Starting relay server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // One client serves both chat completions and images
    let openai = Arc::new(OpenAiBrain::from_env()?);
    let providers = Providers {
        brain: openai.clone(),
        images: openai,
        fetcher: Arc::new(HttpImageFetcher::new()),
        limits: Arc::new(NoUsageLimits),
    };

    let orchestrator_config = OrchestratorConfig::from_env(gateway_config.phone_number.clone());
    let sender = TwilioSender::new(TwilioClient::new(gateway_config)?);
    let orchestrator = Orchestrator::start(db, orchestrator_config, providers, sender).await?;
    info!(
        models = orchestrator.catalog().names().len(),
        "Orchestrator ready"
    );

    // Build router
    let app = routes::router::<TwilioSender>()
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(orchestrator));

    // Start server
    info!(addr = %config.addr, "Relay server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
