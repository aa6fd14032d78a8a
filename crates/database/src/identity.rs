//! Identity lookups and get-or-create.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Identity;

/// Find the surrogate id of an address, if it has been seen.
pub async fn find_identity_id(pool: &SqlitePool, address: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM identities
        WHERE address = ?
        "#,
    )
    .bind(address)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Get the id of an address, creating the identity on first sight.
pub async fn get_or_create_identity(pool: &SqlitePool, address: &str) -> Result<i64> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO identities (address)
        VALUES (?)
        ON CONFLICT(address) DO NOTHING
        "#,
    )
    .bind(address)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::debug!("Identity '{}' added", address);
        return Ok(inserted.last_insert_rowid());
    }

    find_identity_id(pool, address)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Identity",
            id: address.to_string(),
        })
}

/// Get an identity by address.
pub async fn get_identity(pool: &SqlitePool, address: &str) -> Result<Identity> {
    sqlx::query_as::<_, Identity>(
        r#"
        SELECT id, address, created_at
        FROM identities
        WHERE address = ?
        "#,
    )
    .bind(address)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Identity",
        id: address.to_string(),
    })
}
