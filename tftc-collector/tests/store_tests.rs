//! Record store behavior on an on-disk database

use std::collections::HashSet;
use tempfile::TempDir;
use tftc_collector::config::StoreConfig;
use tftc_collector::models::{InsertOutcome, NewMatch, NewRecord, NewSummoner, RecordKind};
use tftc_collector::RecordStore;
use tokio::task::JoinSet;

async fn open_store() -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::open(&temp_dir.path().join("store.db"), &StoreConfig::default())
        .await
        .unwrap();
    (temp_dir, store)
}

fn summoner(puuid: &str) -> NewRecord {
    NewSummoner {
        puuid: puuid.to_string(),
        summoner_level: 42,
        tier: Some("GOLD".to_string()),
        rank: Some("II".to_string()),
        league_points: Some(57),
        fetched_at: "2024-01-01T00:00:00Z".to_string(),
    }
    .into()
}

fn match_record(match_id: &str, participants: &[&str]) -> NewRecord {
    NewMatch {
        match_id: match_id.to_string(),
        payload: serde_json::json!({ "metadata": { "match_id": match_id } }),
        participants: participants.iter().map(|p| p.to_string()).collect(),
        fetched_at: "2024-01-01T00:00:00Z".to_string(),
    }
    .into()
}

#[tokio::test]
async fn test_insert_then_exists() {
    let (_dir, store) = open_store().await;

    assert!(!store.exists(RecordKind::Summoner, "p1").await.unwrap());
    let outcome = store.insert_if_absent(&summoner("p1")).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted { id: 1 });
    assert!(store.exists(RecordKind::Summoner, "p1").await.unwrap());

    // Keys are per kind
    assert!(!store.exists(RecordKind::Match, "p1").await.unwrap());

    let stored = store.get_summoner("p1").await.unwrap().unwrap();
    assert_eq!(stored.id, 1);
    assert_eq!(stored.summoner_level, 42);
    assert_eq!(stored.tier.as_deref(), Some("GOLD"));
    assert_eq!(stored.rank.as_deref(), Some("II"));
    assert_eq!(stored.league_points, Some(57));
}

#[tokio::test]
async fn test_duplicate_does_not_advance_counter() {
    let (_dir, store) = open_store().await;

    store.insert_if_absent(&summoner("p1")).await.unwrap();
    let again = store.insert_if_absent(&summoner("p1")).await.unwrap();

    assert_eq!(again, InsertOutcome::AlreadyPresent);
    assert_eq!(store.count(RecordKind::Summoner).await.unwrap(), 1);
    assert_eq!(store.current_sequence(RecordKind::Summoner).await.unwrap(), 1);

    let next = store.insert_if_absent(&summoner("p2")).await.unwrap();
    assert_eq!(next, InsertOutcome::Inserted { id: 2 });
}

#[tokio::test]
async fn test_sequences_are_per_kind() {
    let (_dir, store) = open_store().await;

    store.insert_if_absent(&summoner("p1")).await.unwrap();
    store.insert_if_absent(&summoner("p2")).await.unwrap();
    let first_match = store
        .insert_if_absent(&match_record("NA1_1", &["p1", "p2"]))
        .await
        .unwrap();

    assert_eq!(first_match, InsertOutcome::Inserted { id: 1 });
}

#[tokio::test]
async fn test_reserved_ids_are_never_reused() {
    let (_dir, store) = open_store().await;

    assert_eq!(store.next_sequence(RecordKind::Match).await.unwrap(), 1);
    assert_eq!(store.next_sequence(RecordKind::Match).await.unwrap(), 2);

    let outcome = store
        .insert_if_absent(&match_record("NA1_1", &[]))
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted { id: 3 });
}

#[tokio::test]
async fn test_match_payload_survives_storage() {
    let (_dir, store) = open_store().await;

    store
        .insert_if_absent(&match_record("NA1_7", &["a", "b", "c"]))
        .await
        .unwrap();

    let stored = store.get_match("NA1_7").await.unwrap().unwrap();
    assert_eq!(stored.participants, vec!["a", "b", "c"]);
    assert_eq!(stored.payload["metadata"]["match_id"], "NA1_7");
    assert!(store.get_match("NA1_8").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_inserts_store_one_row() {
    let (_dir, store) = open_store().await;

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let store = store.clone();
        tasks.spawn(async move { store.insert_if_absent(&summoner("contested")).await });
    }

    let mut inserted = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap().unwrap().is_inserted() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(store.count(RecordKind::Summoner).await.unwrap(), 1);
    assert_eq!(store.current_sequence(RecordKind::Summoner).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ids_unique_and_dense() {
    let (_dir, store) = open_store().await;

    let mut tasks = JoinSet::new();
    for i in 0..32 {
        let store = store.clone();
        tasks.spawn(async move { store.insert_if_absent(&summoner(&format!("p{}", i))).await });
    }

    let mut ids = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        match result.unwrap().unwrap() {
            InsertOutcome::Inserted { id } => assert!(ids.insert(id), "id {} handed out twice", id),
            InsertOutcome::AlreadyPresent => panic!("distinct keys must all insert"),
        }
    }

    let expected: HashSet<i64> = (1..=32).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_ids_follow_insertion_order() {
    let (_dir, store) = open_store().await;

    let mut last = 0;
    for i in 0..10 {
        let puuid = format!("p{}", i);
        store.insert_if_absent(&summoner(&puuid)).await.unwrap();
        let id = store.get_summoner(&puuid).await.unwrap().unwrap().id;
        assert!(id > last);
        last = id;
    }
}

#[tokio::test]
async fn test_reset_clears_records_and_counters() {
    let (_dir, store) = open_store().await;

    store.insert_if_absent(&summoner("p1")).await.unwrap();
    store
        .insert_if_absent(&match_record("NA1_1", &["p1"]))
        .await
        .unwrap();

    store.reset().await.unwrap();

    for kind in RecordKind::ALL {
        assert_eq!(store.count(kind).await.unwrap(), 0);
        assert_eq!(store.current_sequence(kind).await.unwrap(), 0);
    }
    let outcome = store.insert_if_absent(&summoner("p1")).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted { id: 1 });
}

#[tokio::test]
async fn test_records_persist_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.db");

    {
        let store = RecordStore::open(&path, &StoreConfig::default()).await.unwrap();
        store.insert_if_absent(&summoner("p1")).await.unwrap();
        store.pool().close().await;
    }

    let store = RecordStore::open(&path, &StoreConfig::default()).await.unwrap();
    assert!(store.exists(RecordKind::Summoner, "p1").await.unwrap());
    let next = store.insert_if_absent(&summoner("p2")).await.unwrap();
    assert_eq!(next, InsertOutcome::Inserted { id: 2 });
}
