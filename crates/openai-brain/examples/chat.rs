//! Send one chat turn through OpenAiBrain.
//!
//! Run with: cargo run -p openai-brain --example chat
//! Or with a custom message: cargo run -p openai-brain --example chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - OpenAI API key for authentication

use openai_brain::{Brain, ChatMessage, OpenAiBrain, SamplingParams};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };
    let model = env::var("DEFAULT_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

    println!("Initializing OpenAiBrain...");
    let brain = OpenAiBrain::from_env()?;
    println!("Brain initialized: {}", brain.name());
    println!("API URL: {}", brain.config().api_url);
    println!("Model: {}", model);
    println!();

    let models = brain.list_models().await?;
    println!("{} models available", models.len());

    let messages = [
        ChatMessage::system("Respond in one sentence."),
        ChatMessage::user(&message_text),
    ];
    println!("Sending: \"{}\"", message_text);
    println!("Waiting for response...\n");

    let reply = brain
        .complete(&messages, &SamplingParams::for_model(model))
        .await?;

    println!("=== Response ===");
    println!("{}", reply);
    println!("================");

    Ok(())
}
