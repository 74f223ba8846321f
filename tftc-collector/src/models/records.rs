//! Persisted record types
//!
//! Two record kinds reference each other: a match lists the PUUIDs of its
//! participants, and a summoner (resolved by PUUID) yields the ids of matches
//! they played. Both are written once and never updated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record kind, one frontier queue and one table per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Summoner keyed by PUUID
    Summoner,
    /// Match keyed by match id
    Match,
}

impl RecordKind {
    /// Both kinds, summoners first
    pub const ALL: [RecordKind; 2] = [RecordKind::Summoner, RecordKind::Match];

    /// Table holding records of this kind
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Summoner => "summoners",
            RecordKind::Match => "matches",
        }
    }

    /// Column holding the natural key
    pub fn key_column(self) -> &'static str {
        match self {
            RecordKind::Summoner => "puuid",
            RecordKind::Match => "match_id",
        }
    }

    /// Row key in `id_sequences`
    pub fn sequence_key(self) -> &'static str {
        match self {
            RecordKind::Summoner => "summoner",
            RecordKind::Match => "match",
        }
    }

    /// The kind whose identifiers this kind's records point at
    pub fn neighbor(self) -> RecordKind {
        match self {
            RecordKind::Summoner => RecordKind::Match,
            RecordKind::Match => RecordKind::Summoner,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sequence_key())
    }
}

/// Stored summoner row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SummonerRecord {
    /// Display sequence id
    pub id: i64,
    pub puuid: String,
    pub summoner_level: i64,
    /// Ranked tier ("GOLD"), `None` when unranked
    pub tier: Option<String>,
    /// Division within the tier ("II"), `None` when unranked
    pub rank: Option<String>,
    pub league_points: Option<i64>,
    /// RFC 3339 fetch time
    pub fetched_at: String,
}

/// Stored match row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Display sequence id
    pub id: i64,
    pub match_id: String,
    /// Match document as returned by the API
    pub payload: serde_json::Value,
    /// PUUIDs listed in the match metadata
    pub participants: Vec<String>,
    /// RFC 3339 fetch time
    pub fetched_at: String,
}

/// Summoner row before a sequence id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSummoner {
    pub puuid: String,
    pub summoner_level: i64,
    pub tier: Option<String>,
    pub rank: Option<String>,
    pub league_points: Option<i64>,
    pub fetched_at: String,
}

/// Match row before a sequence id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub match_id: String,
    pub payload: serde_json::Value,
    pub participants: Vec<String>,
    pub fetched_at: String,
}

/// A record ready for `RecordStore::insert_if_absent`
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Summoner(NewSummoner),
    Match(NewMatch),
}

impl NewRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            NewRecord::Summoner(_) => RecordKind::Summoner,
            NewRecord::Match(_) => RecordKind::Match,
        }
    }

    /// Natural key of the record
    pub fn key(&self) -> &str {
        match self {
            NewRecord::Summoner(summoner) => &summoner.puuid,
            NewRecord::Match(record) => &record.match_id,
        }
    }
}

impl From<NewSummoner> for NewRecord {
    fn from(summoner: NewSummoner) -> Self {
        NewRecord::Summoner(summoner)
    }
}

impl From<NewMatch> for NewRecord {
    fn from(record: NewMatch) -> Self {
        NewRecord::Match(record)
    }
}

/// Result of `RecordStore::insert_if_absent`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row written with this sequence id
    Inserted { id: i64 },
    /// A row with the same natural key already existed (lost a race or re-run)
    AlreadyPresent,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }
}
