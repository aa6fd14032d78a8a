//! Console relay example.
//!
//! Runs the dispatcher against an in-memory store and an echoing provider,
//! reading one message per line from stdin and printing what would be texted
//! back. Useful for trying out `#` commands without a gateway.
//!
//! Run with: cargo run -p orchestrator --example console_relay
//!
//! Configuration via .env file or environment variables:
//!   RELAY_CHUNK_SIZE   - Characters per outbound chunk (default: 1600)
//!   DEFAULT_MODEL      - Model for new identities
//!   RUST_LOG           - Log filter (default: info)

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use database::Database;
use image_pipeline::HttpImageFetcher;
use mock_brain::{EchoBrain, RecordingImageGenerator};
use orchestrator::{
    InboundMessage, MessageSender, NoUsageLimits, Orchestrator, OrchestratorConfig,
    OrchestratorError, Providers, ReplyChunk,
};
use tracing_subscriber::EnvFilter;

const RELAY: &str = "+15550000000";
const CONSOLE_USER: &str = "+15551234567";

/// Prints each chunk to stdout.
struct ConsoleSender;

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, _recipient: &str, chunk: &ReplyChunk) -> Result<String, OrchestratorError> {
        match chunk {
            ReplyChunk::Text(text) => println!("< {}", text),
            ReplyChunk::Media(url) => println!("< [media] {}", url),
        }
        Ok("console".to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db = Database::in_memory().await?;
    let providers = Providers {
        brain: Arc::new(EchoBrain::with_prefix("echo: ").with_models(["echo-small", "echo-large"])),
        images: Arc::new(RecordingImageGenerator::new("https://example.com/generated.png")),
        fetcher: Arc::new(HttpImageFetcher::new()),
        limits: Arc::new(NoUsageLimits),
    };
    let orchestrator =
        Orchestrator::start(db, OrchestratorConfig::from_env(RELAY), providers, ConsoleSender)
            .await?;

    println!("Type a message, or #help for commands. Ctrl-D to quit.");
    let stdin = io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let inbound = InboundMessage::text(format!("SM{}", index), CONSOLE_USER, RELAY, line);
        orchestrator.process(inbound).await?;
        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
