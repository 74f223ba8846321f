//! Record store
//!
//! Write-once persistence for summoners and matches. Each record gets a
//! display id from a per-kind counter that advances in the same transaction
//! as the insert, so a duplicate that loses a race never consumes an id.

pub mod matches;
pub mod sequences;
pub mod summoners;

use crate::config::StoreConfig;
use crate::models::{InsertOutcome, MatchRecord, NewRecord, RecordKind, SummonerRecord};
use crate::utils::retry_on_lock;
use sqlx::SqlitePool;
use std::path::Path;
use tftc_common::db::{init_database, init_memory_database};
use tftc_common::Result;
use tracing::{debug, info};

/// Shared handle to the record database (cheap to clone)
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    max_lock_wait_ms: u64,
}

impl RecordStore {
    /// Open (or create) the database file
    pub async fn open(path: &Path, config: &StoreConfig) -> Result<Self> {
        let pool = init_database(path).await?;
        Ok(Self::from_pool(pool, config.max_lock_wait_ms))
    }

    /// Private in-memory store
    pub async fn in_memory() -> Result<Self> {
        let pool = init_memory_database().await?;
        Ok(Self::from_pool(pool, StoreConfig::default().max_lock_wait_ms))
    }

    pub fn from_pool(pool: SqlitePool, max_lock_wait_ms: u64) -> Self {
        Self {
            pool,
            max_lock_wait_ms,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// True when a record with this natural key is stored
    pub async fn exists(&self, kind: RecordKind, key: &str) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            kind.table(),
            kind.key_column()
        );
        let found: i64 = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }

    /// Insert the record unless its key is already stored
    ///
    /// A duplicate, including one written concurrently by another worker, is
    /// `AlreadyPresent` rather than an error.
    pub async fn insert_if_absent(&self, record: &NewRecord) -> Result<InsertOutcome> {
        let outcome = retry_on_lock("insert record", self.max_lock_wait_ms, move || {
            self.try_insert(record)
        })
        .await?;

        match outcome {
            InsertOutcome::Inserted { id } => {
                debug!(kind = %record.kind(), key = record.key(), id, "Stored record");
            }
            InsertOutcome::AlreadyPresent => {
                debug!(kind = %record.kind(), key = record.key(), "Record already stored");
            }
        }

        Ok(outcome)
    }

    async fn try_insert(&self, record: &NewRecord) -> Result<InsertOutcome> {
        let mut tx = self.pool.begin().await?;

        let id = sequences::advance(&mut *tx, record.kind()).await?;
        let rows = match record {
            NewRecord::Summoner(summoner) => summoners::insert(&mut *tx, id, summoner).await?,
            NewRecord::Match(new_match) => matches::insert(&mut *tx, id, new_match).await?,
        };

        if rows == 0 {
            // Rolling back also returns the counter to its previous value
            tx.rollback().await?;
            return Ok(InsertOutcome::AlreadyPresent);
        }

        tx.commit().await?;
        Ok(InsertOutcome::Inserted { id })
    }

    /// Reserve the next id for `kind` outside any insert
    ///
    /// The reservation is committed immediately; an id is never handed out
    /// twice, though unused reservations leave gaps.
    pub async fn next_sequence(&self, kind: RecordKind) -> Result<i64> {
        retry_on_lock("reserve sequence", self.max_lock_wait_ms, move || async move {
            let mut tx = self.pool.begin().await?;
            let id = sequences::advance(&mut *tx, kind).await?;
            tx.commit().await?;
            Ok(id)
        })
        .await
    }

    /// Last id handed out for `kind` (0 before the first)
    pub async fn current_sequence(&self, kind: RecordKind) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        sequences::current(&mut *conn, kind).await
    }

    /// Number of stored records of `kind`
    pub async fn count(&self, kind: RecordKind) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub async fn get_summoner(&self, puuid: &str) -> Result<Option<SummonerRecord>> {
        summoners::load(&self.pool, puuid).await
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        matches::load(&self.pool, match_id).await
    }

    /// Delete every record and reset both counters
    pub async fn reset(&self) -> Result<()> {
        retry_on_lock("reset store", self.max_lock_wait_ms, move || async move {
            let mut tx = self.pool.begin().await?;
            for kind in RecordKind::ALL {
                sqlx::query(&format!("DELETE FROM {}", kind.table()))
                    .execute(&mut *tx)
                    .await?;
            }
            sqlx::query("DELETE FROM id_sequences")
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok(())
        })
        .await?;

        info!("Record store reset");
        Ok(())
    }
}
