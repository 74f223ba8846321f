//! tftc-collector library interface
//!
//! Crawls the TFT match graph outward from a seed match: matches name their
//! participants, participants name their recent matches. Every record is
//! stored once in SQLite.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod error_sink;
pub mod frontier;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod services;
pub mod utils;
pub mod worker_pool;

pub use crate::context::CollectorContext;
pub use crate::db::RecordStore;
pub use crate::error::{CollectError, CollectorError, CollectorResult, FetchError};
pub use crate::orchestrator::Collector;
