//! Per-kind id counters (`id_sequences`)

use crate::models::RecordKind;
use sqlx::SqliteConnection;
use tftc_common::Result;

/// Advance the counter for `kind` and return the new value
///
/// The first value handed out is 1. Must run inside the caller's transaction
/// so a rollback undoes the advance.
pub async fn advance(conn: &mut SqliteConnection, kind: RecordKind) -> Result<i64> {
    let value: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO id_sequences (kind, value) VALUES (?, 1)
        ON CONFLICT(kind) DO UPDATE SET value = value + 1
        RETURNING value
        "#,
    )
    .bind(kind.sequence_key())
    .fetch_one(conn)
    .await?;

    Ok(value)
}

/// Current counter value without advancing it (0 before the first id)
pub async fn current(conn: &mut SqliteConnection, kind: RecordKind) -> Result<i64> {
    let value: Option<i64> = sqlx::query_scalar("SELECT value FROM id_sequences WHERE kind = ?")
        .bind(kind.sequence_key())
        .fetch_optional(conn)
        .await?;

    Ok(value.unwrap_or(0))
}
