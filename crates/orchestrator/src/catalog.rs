//! Read-only snapshot of the model catalog.

use brain_core::Brain;
use database::{model_catalog, Database};
use tracing::{info, warn};

use crate::error::Result;

/// Model names advertised by the provider, ascending and deduplicated.
///
/// Built once at startup and handed to whoever needs it; it is never
/// refreshed during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    names: Vec<String>,
}

impl ModelCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Snapshot of the stored catalog.
    pub async fn load(db: &Database) -> Result<Self> {
        Ok(Self::new(model_catalog::list_models(db.pool()).await?))
    }

    /// Store the provider's current model list, then snapshot the catalog.
    ///
    /// If the provider cannot be reached the stored catalog is used as is.
    pub async fn refresh(db: &Database, brain: &dyn Brain) -> Result<Self> {
        match brain.list_models().await {
            Ok(names) => {
                let added = model_catalog::upsert_models(db.pool(), &names).await?;
                info!(
                    "Model catalog refreshed from {}: {} advertised, {} new",
                    brain.name(),
                    names.len(),
                    added
                );
            }
            Err(e) => warn!("Could not refresh model catalog, using stored models: {}", e),
        }

        Self::load(db).await
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
