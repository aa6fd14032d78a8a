//! Application state shared across handlers.

use std::sync::Arc;

use orchestrator::{MessageSender, Orchestrator};

/// Shared application state.
pub struct AppState<S: MessageSender> {
    /// The dispatcher every webhook runs through.
    pub orchestrator: Arc<Orchestrator<S>>,
}

impl<S: MessageSender> AppState<S> {
    /// Create new application state.
    pub fn new(orchestrator: Orchestrator<S>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S: MessageSender> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}
