//! Summoner rows

use crate::models::{NewSummoner, SummonerRecord};
use sqlx::{SqliteConnection, SqlitePool};
use tftc_common::Result;

/// Insert a summoner with `id`; returns 0 rows when the PUUID is already stored
pub async fn insert(conn: &mut SqliteConnection, id: i64, summoner: &NewSummoner) -> Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO summoners (id, puuid, summoner_level, tier, rank, league_points, fetched_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(puuid) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(&summoner.puuid)
    .bind(summoner.summoner_level)
    .bind(&summoner.tier)
    .bind(&summoner.rank)
    .bind(summoner.league_points)
    .bind(&summoner.fetched_at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn load(pool: &SqlitePool, puuid: &str) -> Result<Option<SummonerRecord>> {
    let record = sqlx::query_as::<_, SummonerRecord>(
        r#"
        SELECT id, puuid, summoner_level, tier, rank, league_points, fetched_at
        FROM summoners
        WHERE puuid = ?
        "#,
    )
    .bind(puuid)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
