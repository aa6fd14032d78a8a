//! SQLite persistence layer for the TextGPT relay.
//!
//! This crate stores identities, message history, per-identity settings,
//! system prompts, and the model catalog using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{message, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:textgpt.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Record an inbound text
//!     message::insert_message(db.pool(), "SM123", "+15550001", "+15559999", "hello").await?;
//!
//!     let history = message::list_messages_for(db.pool(), "+15550001").await?;
//!     assert_eq!(history.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod identity;
pub mod message;
pub mod model_catalog;
pub mod models;
pub mod settings;
pub mod system_prompt;

pub use error::{DatabaseError, Result};
pub use models::{Identity, Message, Settings, SettingsUpdate};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// Each pooled connection to `sqlite::memory:` opens its own empty
    /// database, so in-memory callers should use
    /// [`Database::connect_with_pool_size`] with a size of 1.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Connect to a private in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        Settings {
            model: Some("gpt-3.5-turbo".to_string()),
            system_prompt: Some("Be brief.".to_string()),
            stop_sequence: None,
            max_tokens: None,
            temperature: 1.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }

    #[tokio::test]
    async fn test_identity_get_or_create_is_stable() {
        let db = Database::in_memory().await.unwrap();

        let first = identity::get_or_create_identity(db.pool(), "+15550001").await.unwrap();
        let second = identity::get_or_create_identity(db.pool(), "+15550001").await.unwrap();
        assert_eq!(first, second);

        let fetched = identity::get_identity(db.pool(), "+15550001").await.unwrap();
        assert_eq!(fetched.id, first);

        let missing = identity::get_identity(db.pool(), "+15550002").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_message_history_order_and_delete() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();

        message::insert_message(pool, "SM1", "+1user", "+1relay", "hi").await.unwrap();
        message::insert_message(pool, "SM2", "+1relay", "+1user", "hello").await.unwrap();
        message::insert_message(pool, "SM3", "+1other", "+1relay", "unrelated").await.unwrap();

        let history = message::list_messages_for(pool, "+1user").await.unwrap();
        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["hi", "hello"]);
        assert_eq!(history[0].from_address, "+1user");
        assert_eq!(history[1].to_address, "+1user");

        assert_eq!(message::count_messages_for(pool, "+1user").await.unwrap(), 2);

        let removed = message::delete_messages_for(pool, "+1user").await.unwrap();
        assert_eq!(removed, 2);
        assert!(message::list_messages_for(pool, "+1user").await.unwrap().is_empty());
        assert_eq!(message::count_messages_for(pool, "+1other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_address_has_no_history() {
        let db = Database::in_memory().await.unwrap();
        let history = message::list_messages_for(db.pool(), "+1nobody").await.unwrap();
        assert!(history.is_empty());
        assert_eq!(message::delete_messages_for(db.pool(), "+1nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_settings_insert_once_and_update() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();

        assert!(settings::get_settings(pool, "+1user").await.unwrap().is_none());
        assert!(settings::insert_settings_if_absent(pool, "+1user", &defaults()).await.unwrap());
        assert!(!settings::insert_settings_if_absent(pool, "+1user", &defaults()).await.unwrap());

        let stored = settings::get_settings(pool, "+1user").await.unwrap().unwrap();
        assert_eq!(stored, defaults());

        settings::update_settings(pool, "+1user", &SettingsUpdate::Temperature(0.2))
            .await
            .unwrap();
        settings::update_settings(pool, "+1user", &SettingsUpdate::Model("gpt-4".to_string()))
            .await
            .unwrap();
        settings::update_settings(pool, "+1user", &SettingsUpdate::MaxTokens(Some(50)))
            .await
            .unwrap();

        let stored = settings::get_settings(pool, "+1user").await.unwrap().unwrap();
        assert_eq!(stored.temperature, 0.2);
        assert_eq!(stored.model.as_deref(), Some("gpt-4"));
        assert_eq!(stored.max_tokens, Some(50));
        assert!(model_catalog::list_models(pool).await.unwrap().contains(&"gpt-4".to_string()));

        settings::replace_settings(pool, "+1user", &defaults()).await.unwrap();
        let stored = settings::get_settings(pool, "+1user").await.unwrap().unwrap();
        assert_eq!(stored, defaults());
    }

    #[tokio::test]
    async fn test_update_without_settings_row_is_not_found() {
        let db = Database::in_memory().await.unwrap();
        let result =
            settings::update_settings(db.pool(), "+1ghost", &SettingsUpdate::TopP(0.5)).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_catalog_upsert_keeps_existing() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();

        let names = vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()];
        assert_eq!(model_catalog::upsert_models(pool, &names).await.unwrap(), 2);
        assert_eq!(model_catalog::upsert_models(pool, &names).await.unwrap(), 0);
        assert_eq!(
            model_catalog::list_models(pool).await.unwrap(),
            vec!["gpt-3.5-turbo".to_string(), "gpt-4".to_string()]
        );

        let prompt_id = system_prompt::get_or_create_system_prompt(pool, "Be brief.")
            .await
            .unwrap();
        assert_eq!(
            system_prompt::get_system_prompt(pool, prompt_id).await.unwrap(),
            "Be brief."
        );
    }
}
