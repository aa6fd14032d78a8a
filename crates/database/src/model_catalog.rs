//! Model catalog storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};

/// Get the id of a model name, storing it on first use.
pub async fn get_or_create_model(pool: &SqlitePool, name: &str) -> Result<i64> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO models (name)
        VALUES (?)
        ON CONFLICT(name) DO NOTHING
        "#,
    )
    .bind(name)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        return Ok(inserted.last_insert_rowid());
    }

    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM models
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Model",
        id: name.to_string(),
    })
}

/// Store every model name in one transaction. Already-known names are kept.
///
/// Returns how many names were new.
pub async fn upsert_models(pool: &SqlitePool, names: &[String]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut added = 0;

    for name in names {
        let result = sqlx::query(
            r#"
            INSERT INTO models (name)
            VALUES (?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(name)
        .execute(&mut *tx)
        .await?;
        added += result.rows_affected();
    }

    tx.commit().await?;
    Ok(added)
}

/// List all stored model names, ascending.
pub async fn list_models(pool: &SqlitePool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT name FROM models
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}
