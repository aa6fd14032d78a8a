//! Message history persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::identity::{find_identity_id, get_or_create_identity};
use crate::models::Message;

const SELECT_MESSAGE: &str = r#"
    SELECT m.id, m.external_id, f.address AS from_address, t.address AS to_address,
           m.body, m.created_at
    FROM messages m
    JOIN identities f ON f.id = m.from_identity_id
    JOIN identities t ON t.id = m.to_identity_id
"#;

/// Record a transmission. Both addresses are created if they are new.
pub async fn insert_message(
    pool: &SqlitePool,
    external_id: &str,
    from: &str,
    to: &str,
    body: &str,
) -> Result<Message> {
    let from_id = get_or_create_identity(pool, from).await?;
    let to_id = get_or_create_identity(pool, to).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO messages (external_id, from_identity_id, to_identity_id, body)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(external_id)
    .bind(from_id)
    .bind(to_id)
    .bind(body)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!("Message {} recorded ({} -> {})", id, from, to);
    get_message(pool, id).await
}

/// Get a message by id.
pub async fn get_message(pool: &SqlitePool, id: i64) -> Result<Message> {
    let sql = format!("{SELECT_MESSAGE} WHERE m.id = ?");
    sqlx::query_as::<_, Message>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Message",
            id: id.to_string(),
        })
}

/// List every message sent by or to an address, oldest first.
///
/// An unknown address has no history and yields an empty list.
pub async fn list_messages_for(pool: &SqlitePool, address: &str) -> Result<Vec<Message>> {
    let Some(identity_id) = find_identity_id(pool, address).await? else {
        return Ok(Vec::new());
    };

    let sql = format!(
        "{SELECT_MESSAGE} WHERE m.from_identity_id = ? OR m.to_identity_id = ? \
         ORDER BY m.created_at ASC, m.id ASC"
    );
    let messages = sqlx::query_as::<_, Message>(&sql)
        .bind(identity_id)
        .bind(identity_id)
        .fetch_all(pool)
        .await?;

    Ok(messages)
}

/// Delete every message sent by or to an address. Returns the number removed.
pub async fn delete_messages_for(pool: &SqlitePool, address: &str) -> Result<u64> {
    let Some(identity_id) = find_identity_id(pool, address).await? else {
        return Ok(0);
    };

    let result = sqlx::query(
        r#"
        DELETE FROM messages
        WHERE from_identity_id = ? OR to_identity_id = ?
        "#,
    )
    .bind(identity_id)
    .bind(identity_id)
    .execute(pool)
    .await?;

    tracing::info!(
        "Removed {} messages for '{}'",
        result.rows_affected(),
        address
    );
    Ok(result.rows_affected())
}

/// Count messages sent by or to an address.
pub async fn count_messages_for(pool: &SqlitePool, address: &str) -> Result<i64> {
    let Some(identity_id) = find_identity_id(pool, address).await? else {
        return Ok(0);
    };

    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages
        WHERE from_identity_id = ? OR to_identity_id = ?
        "#,
    )
    .bind(identity_id)
    .bind(identity_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
