//! Data models for the collector

pub mod records;
pub mod run_state;

pub use records::{
    InsertOutcome, MatchRecord, NewMatch, NewRecord, NewSummoner, RecordKind, SummonerRecord,
};
pub use run_state::{RunState, RunSummary};
