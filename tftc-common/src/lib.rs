//! # TFTC Common Library
//!
//! Shared code for the TFT collector tools:
//! - Error and result types
//! - Configuration file discovery and TOML loading
//! - SQLite database initialization (record tables and sequence counters)
//! - Timestamp helpers

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
