//! Main orchestrator that dispatches inbound messages.

use std::env;
use std::sync::Arc;

use brain_core::{Brain, BrainError, ImageGenerator, InboundMessage};
use database::{identity, message, model_catalog, system_prompt, Database};
use image_pipeline::ImageFetcher;
use tracing::{debug, error, info, warn};

use crate::catalog::ModelCatalog;
use crate::chunking::{split_reply, DEFAULT_CHUNK_SIZE};
use crate::commands::{error_reply, is_command, CommandInterpreter};
use crate::conversation::build_turn;
use crate::error::{OrchestratorError, Result};
use crate::limits::UsageLimits;
use crate::sender::MessageSender;
use crate::settings::{sampling_params, SettingsDefaults, SettingsResolver};

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// The relay's own address; replies are sent from it.
    pub service_identity: String,
    /// Maximum characters per outbound transmission.
    pub chunk_size: usize,
    /// Defaults for first-contact settings.
    pub defaults: SettingsDefaults,
}

impl OrchestratorConfig {
    pub fn new(service_identity: impl Into<String>) -> Self {
        Self {
            service_identity: service_identity.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            defaults: SettingsDefaults::default(),
        }
    }

    /// Build from environment variables.
    ///
    /// - `RELAY_CHUNK_SIZE` - characters per transmission (default: 1600)
    /// - `DEFAULT_MODEL` / `DEFAULT_SYSTEM_PROMPT` - see [`SettingsDefaults::from_env`]
    pub fn from_env(service_identity: impl Into<String>) -> Self {
        let chunk_size = env::var("RELAY_CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size: &usize| *size > 0)
            .unwrap_or(DEFAULT_CHUNK_SIZE);

        Self {
            service_identity: service_identity.into(),
            chunk_size,
            defaults: SettingsDefaults::from_env(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_defaults(mut self, defaults: SettingsDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// External collaborators used while handling a message.
#[derive(Clone)]
pub struct Providers {
    pub brain: Arc<dyn Brain>,
    pub images: Arc<dyn ImageGenerator>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub limits: Arc<dyn UsageLimits>,
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Row id of the recorded inbound message.
    pub inbound_id: i64,
    /// Full reply text, before chunking.
    pub reply: String,
    /// Chunks the gateway accepted.
    pub chunks_sent: usize,
    /// Chunks the gateway rejected.
    pub chunks_failed: usize,
}

/// Prepare the store for dispatching and snapshot the model catalog.
///
/// Registers the relay's identity, seeds the default prompt and model, and
/// refreshes the catalog from the provider.
pub async fn prepare_store(
    db: &Database,
    config: &OrchestratorConfig,
    brain: &dyn Brain,
) -> Result<ModelCatalog> {
    identity::get_or_create_identity(db.pool(), &config.service_identity).await?;
    system_prompt::get_or_create_system_prompt(db.pool(), &config.defaults.system_prompt).await?;
    model_catalog::get_or_create_model(db.pool(), &config.defaults.model).await?;

    let catalog = ModelCatalog::refresh(db, brain).await?;
    info!(
        "Store ready for {} ({} models)",
        config.service_identity,
        catalog.names().len()
    );
    Ok(catalog)
}

/// Main orchestrator that dispatches inbound messages.
///
/// Each message runs to completion:
/// 1. Record the inbound message
/// 2. Resolve the sender's settings, creating defaults on first contact
/// 3. Run a `#` command, or build the conversation and ask the provider
/// 4. Split the reply into chunks, send each and record it
pub struct Orchestrator<S: MessageSender> {
    db: Database,
    config: OrchestratorConfig,
    resolver: SettingsResolver,
    catalog: ModelCatalog,
    providers: Providers,
    sender: S,
}

impl<S: MessageSender> Orchestrator<S> {
    /// Create an orchestrator around an already prepared store.
    pub fn new(
        db: Database,
        config: OrchestratorConfig,
        catalog: ModelCatalog,
        providers: Providers,
        sender: S,
    ) -> Self {
        let resolver = SettingsResolver::new(db.clone(), config.defaults.clone());
        Self {
            db,
            config,
            resolver,
            catalog,
            providers,
            sender,
        }
    }

    /// Prepare the store, then create the orchestrator.
    pub async fn start(
        db: Database,
        config: OrchestratorConfig,
        providers: Providers,
        sender: S,
    ) -> Result<Self> {
        let catalog = prepare_store(&db, &config, providers.brain.as_ref()).await?;
        Ok(Self::new(db, config, catalog, providers, sender))
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Process an incoming message end-to-end.
    ///
    /// Only a failure to record the inbound message is returned as an error.
    /// Anything that goes wrong afterwards becomes the reply text.
    pub async fn process(&self, inbound: InboundMessage) -> Result<DispatchOutcome> {
        let recorded = message::insert_message(
            self.db.pool(),
            &inbound.external_id,
            &inbound.from,
            &inbound.to,
            &inbound.body,
        )
        .await?;

        let command = is_command(&inbound.body);
        info!(
            "Processing {} from {} ({})",
            inbound.external_id,
            inbound.from,
            if command { "command" } else { "chat" }
        );

        let reply = match self.reply_for(&inbound, command).await {
            Ok(reply) => reply,
            Err(e) => {
                if matches!(e, OrchestratorError::DataConsistency { .. }) {
                    error!("History for {} is inconsistent: {}", inbound.from, e);
                } else {
                    warn!("Failed to answer {}: {}", inbound.external_id, e);
                }
                error_reply(&e)
            }
        };

        let (chunks_sent, chunks_failed) = self.deliver(&inbound.from, &reply).await;

        Ok(DispatchOutcome {
            inbound_id: recorded.id,
            reply,
            chunks_sent,
            chunks_failed,
        })
    }

    async fn reply_for(&self, inbound: &InboundMessage, command: bool) -> Result<String> {
        let settings = self.resolver.resolve(&inbound.from).await?;

        if command {
            let interpreter = CommandInterpreter {
                db: &self.db,
                resolver: &self.resolver,
                catalog: &self.catalog,
                images: self.providers.images.as_ref(),
                fetcher: self.providers.fetcher.as_ref(),
                limits: self.providers.limits.as_ref(),
            };
            return Ok(interpreter
                .execute(
                    &inbound.from,
                    &inbound.body,
                    &settings,
                    inbound.media_url.as_deref(),
                )
                .await);
        }

        let turn = build_turn(
            &self.db,
            &inbound.from,
            &self.config.service_identity,
            &settings,
        )
        .await?;
        let params = sampling_params(&settings, &self.config.defaults);
        debug!("Completing with {} ({} messages)", params.model, turn.len());

        let reply = self.providers.brain.complete(&turn, &params).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(BrainError::ProcessingFailed(format!(
                "{} returned an empty completion",
                params.model
            ))
            .into());
        }
        Ok(reply.to_string())
    }

    /// Send the reply chunk by chunk, recording each accepted chunk.
    ///
    /// Returns (sent, failed). A failed chunk does not stop the rest.
    async fn deliver(&self, recipient: &str, reply: &str) -> (usize, usize) {
        let chunks = split_reply(reply, self.config.chunk_size);
        if chunks.is_empty() {
            debug!("Empty reply for {}, nothing to send", recipient);
            return (0, 0);
        }

        let mut sent = 0;
        let mut failed = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            let external_id = match self.sender.send(recipient, chunk).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(
                        "Failed to send chunk {}/{} to {}: {}",
                        index + 1,
                        chunks.len(),
                        recipient,
                        e
                    );
                    failed += 1;
                    continue;
                }
            };
            sent += 1;

            if let Err(e) = message::insert_message(
                self.db.pool(),
                &external_id,
                &self.config.service_identity,
                recipient,
                chunk.content(),
            )
            .await
            {
                warn!("Sent {} but could not record it: {}", external_id, e);
            }
        }

        info!("Replied to {} in {} chunk(s)", recipient, sent);
        (sent, failed)
    }
}
