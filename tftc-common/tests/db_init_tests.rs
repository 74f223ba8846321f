//! Tests for database initialization

use tempfile::TempDir;
use tftc_common::db::init::{init_database, init_memory_database, TABLE_NAMES};

async fn table_names(pool: &sqlx::SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("tftc.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("tftc.db");

    let first = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO id_sequences (kind, value) VALUES ('summoner', 7)")
        .execute(&first)
        .await
        .unwrap();
    first.close().await;

    // Re-opening must not wipe existing rows
    let second = init_database(&db_path).await.unwrap();
    let value: i64 = sqlx::query_scalar("SELECT value FROM id_sequences WHERE kind = 'summoner'")
        .fetch_one(&second)
        .await
        .unwrap();
    assert_eq!(value, 7);
}

#[tokio::test]
async fn test_all_tables_created() {
    let pool = init_memory_database().await.unwrap();
    let names = table_names(&pool).await;

    for expected in TABLE_NAMES {
        assert!(
            names.iter().any(|n| n == expected),
            "missing table {} in {:?}",
            expected,
            names
        );
    }
}

#[tokio::test]
async fn test_natural_keys_are_unique() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query(
        "INSERT INTO summoners (id, puuid, summoner_level, fetched_at) VALUES (1, 'p-1', 30, 'now')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let duplicate = sqlx::query(
        "INSERT INTO summoners (id, puuid, summoner_level, fetched_at) VALUES (2, 'p-1', 31, 'now')",
    )
    .execute(&pool)
    .await;

    assert!(duplicate.is_err(), "second row with the same PUUID was accepted");
}
