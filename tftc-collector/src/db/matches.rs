//! Match rows
//!
//! The API document and the participant list are stored as JSON text.

use crate::models::{MatchRecord, NewMatch};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tftc_common::Result;

/// Insert a match with `id`; returns 0 rows when the match id is already stored
pub async fn insert(conn: &mut SqliteConnection, id: i64, new_match: &NewMatch) -> Result<u64> {
    let payload = serde_json::to_string(&new_match.payload)?;
    let participants = serde_json::to_string(&new_match.participants)?;

    let result = sqlx::query(
        r#"
        INSERT INTO matches (id, match_id, payload, participants, fetched_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(match_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&new_match.match_id)
    .bind(payload)
    .bind(participants)
    .bind(&new_match.fetched_at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn load(pool: &SqlitePool, match_id: &str) -> Result<Option<MatchRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, match_id, payload, participants, fetched_at
        FROM matches
        WHERE match_id = ?
        "#,
    )
    .bind(match_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let payload: String = row.get("payload");
    let participants: String = row.get("participants");

    Ok(Some(MatchRecord {
        id: row.get("id"),
        match_id: row.get("match_id"),
        payload: serde_json::from_str(&payload)?,
        participants: serde_json::from_str(&participants)?,
        fetched_at: row.get("fetched_at"),
    }))
}
