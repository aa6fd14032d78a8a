//! Per-identity settings.
//!
//! Prompt and model are stored by reference; writes get-or-create the
//! referenced rows first so a settings row never points at nothing.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::identity::{find_identity_id, get_or_create_identity};
use crate::model_catalog::get_or_create_model;
use crate::models::{Settings, SettingsUpdate};
use crate::system_prompt::get_or_create_system_prompt;

impl SettingsUpdate {
    /// Column written by this update.
    fn column(&self) -> &'static str {
        match self {
            Self::Model(_) => "model_id",
            Self::SystemPrompt(_) => "system_prompt_id",
            Self::StopSequence(_) => "stop_sequence",
            Self::MaxTokens(_) => "max_tokens",
            Self::Temperature(_) => "temperature",
            Self::TopP(_) => "top_p",
            Self::FrequencyPenalty(_) => "frequency_penalty",
            Self::PresencePenalty(_) => "presence_penalty",
        }
    }
}

/// Get the settings for an address, or `None` if it has none yet.
pub async fn get_settings(pool: &SqlitePool, address: &str) -> Result<Option<Settings>> {
    let settings = sqlx::query_as::<_, Settings>(
        r#"
        SELECT mo.name AS model, sp.prompt AS system_prompt, s.stop_sequence, s.max_tokens,
               s.temperature, s.top_p, s.frequency_penalty, s.presence_penalty
        FROM settings s
        JOIN identities i ON i.id = s.identity_id
        LEFT JOIN models mo ON mo.id = s.model_id
        LEFT JOIN system_prompts sp ON sp.id = s.system_prompt_id
        WHERE i.address = ?
        "#,
    )
    .bind(address)
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

async fn reference_ids(pool: &SqlitePool, settings: &Settings) -> Result<(Option<i64>, Option<i64>)> {
    let prompt_id = match settings.system_prompt.as_deref() {
        Some(prompt) => Some(get_or_create_system_prompt(pool, prompt).await?),
        None => None,
    };
    let model_id = match settings.model.as_deref() {
        Some(model) => Some(get_or_create_model(pool, model).await?),
        None => None,
    };
    Ok((prompt_id, model_id))
}

/// Insert settings for an address unless it already has a row.
///
/// Returns `true` if a row was inserted. Concurrent callers cannot create a
/// second row: the identity is the primary key.
pub async fn insert_settings_if_absent(
    pool: &SqlitePool,
    address: &str,
    settings: &Settings,
) -> Result<bool> {
    let identity_id = get_or_create_identity(pool, address).await?;
    let (prompt_id, model_id) = reference_ids(pool, settings).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO settings (identity_id, system_prompt_id, model_id, stop_sequence, max_tokens,
                              temperature, top_p, frequency_penalty, presence_penalty)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(identity_id) DO NOTHING
        "#,
    )
    .bind(identity_id)
    .bind(prompt_id)
    .bind(model_id)
    .bind(&settings.stop_sequence)
    .bind(settings.max_tokens)
    .bind(settings.temperature)
    .bind(settings.top_p)
    .bind(settings.frequency_penalty)
    .bind(settings.presence_penalty)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Overwrite every field of an existing settings row.
pub async fn replace_settings(pool: &SqlitePool, address: &str, settings: &Settings) -> Result<()> {
    let identity_id = require_identity(pool, address).await?;
    let (prompt_id, model_id) = reference_ids(pool, settings).await?;

    let result = sqlx::query(
        r#"
        UPDATE settings
        SET system_prompt_id = ?, model_id = ?, stop_sequence = ?, max_tokens = ?,
            temperature = ?, top_p = ?, frequency_penalty = ?, presence_penalty = ?,
            updated_at = datetime('now')
        WHERE identity_id = ?
        "#,
    )
    .bind(prompt_id)
    .bind(model_id)
    .bind(&settings.stop_sequence)
    .bind(settings.max_tokens)
    .bind(settings.temperature)
    .bind(settings.top_p)
    .bind(settings.frequency_penalty)
    .bind(settings.presence_penalty)
    .bind(identity_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Settings",
            id: address.to_string(),
        });
    }

    Ok(())
}

/// Change a single settings field.
pub async fn update_settings(
    pool: &SqlitePool,
    address: &str,
    update: &SettingsUpdate,
) -> Result<()> {
    let identity_id = require_identity(pool, address).await?;

    let sql = format!(
        "UPDATE settings SET {} = ?, updated_at = datetime('now') WHERE identity_id = ?",
        update.column()
    );
    let query = sqlx::query(&sql);
    let query = match update {
        SettingsUpdate::Model(name) => query.bind(get_or_create_model(pool, name).await?),
        SettingsUpdate::SystemPrompt(prompt) => {
            query.bind(get_or_create_system_prompt(pool, prompt).await?)
        }
        SettingsUpdate::StopSequence(stop) => query.bind(stop.clone()),
        SettingsUpdate::MaxTokens(max_tokens) => query.bind(*max_tokens),
        SettingsUpdate::Temperature(value)
        | SettingsUpdate::TopP(value)
        | SettingsUpdate::FrequencyPenalty(value)
        | SettingsUpdate::PresencePenalty(value) => query.bind(*value),
    };

    let result = query.bind(identity_id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Settings",
            id: address.to_string(),
        });
    }

    tracing::debug!("Settings column {} updated for '{}'", update.column(), address);
    Ok(())
}

async fn require_identity(pool: &SqlitePool, address: &str) -> Result<i64> {
    find_identity_id(pool, address)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Identity",
            id: address.to_string(),
        })
}
