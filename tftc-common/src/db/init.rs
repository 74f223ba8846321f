//! Database initialization
//!
//! Opens (or creates) the collector database and makes sure the record
//! tables and the per-kind sequence counter table exist.
//!
//! Tables:
//! - `summoners`: one row per PUUID, never updated after insert
//! - `matches`: one row per match id with the full payload as JSON text
//! - `id_sequences`: one monotonically increasing counter per record kind

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every pooled connection
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Worker pools issue concurrent existence checks; give them enough connections
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    let pragma_sql = format!("PRAGMA busy_timeout = {}", DEFAULT_BUSY_TIMEOUT_MS);
    sqlx::query(&pragma_sql).execute(&pool).await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the collector schema
///
/// The pool is limited to a single connection: every `:memory:` connection is
/// its own database, so more than one would split the data.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all collector tables (idempotent)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_summoners_table(pool).await?;
    create_matches_table(pool).await?;
    create_id_sequences_table(pool).await?;
    Ok(())
}

/// Create the summoners table
///
/// `puuid` is the natural key; `id` is the display sequence id.
pub async fn create_summoners_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS summoners (
            id INTEGER NOT NULL UNIQUE,
            puuid TEXT NOT NULL UNIQUE,
            summoner_level INTEGER NOT NULL,
            tier TEXT,
            rank TEXT,
            league_points INTEGER,
            fetched_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the matches table
///
/// `payload` holds the match document as returned by the API (JSON text),
/// `participants` the PUUID list from its metadata (JSON array).
pub async fn create_matches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER NOT NULL UNIQUE,
            match_id TEXT NOT NULL UNIQUE,
            payload TEXT NOT NULL,
            participants TEXT NOT NULL,
            fetched_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the per-kind sequence counter table
pub async fn create_id_sequences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS id_sequences (
            kind TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Names of the tables created by `create_tables`
pub const TABLE_NAMES: [&str; 3] = ["summoners", "matches", "id_sequences"];
