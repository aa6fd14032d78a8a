//! System prompt storage. Prompts are deduplicated by their text.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};

/// Get the id of a prompt, storing it on first use.
pub async fn get_or_create_system_prompt(pool: &SqlitePool, prompt: &str) -> Result<i64> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO system_prompts (prompt)
        VALUES (?)
        ON CONFLICT(prompt) DO NOTHING
        "#,
    )
    .bind(prompt)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        return Ok(inserted.last_insert_rowid());
    }

    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM system_prompts
        WHERE prompt = ?
        "#,
    )
    .bind(prompt)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "SystemPrompt",
        id: prompt.to_string(),
    })
}

/// Get a prompt's text by id.
pub async fn get_system_prompt(pool: &SqlitePool, id: i64) -> Result<String> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT prompt FROM system_prompts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "SystemPrompt",
        id: id.to_string(),
    })
}
