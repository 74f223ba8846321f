//! Error types for tftc-collector
//!
//! Taxonomy:
//! - NotFound is not an error: fetches return `Ok(None)`
//! - `FetchError::Transient` / `Network` / `Decode`: counted by the error sink
//! - `FetchError::Fatal`: bad credentials or malformed request, stops the run
//! - Duplicate inserts are not errors (`InsertOutcome::AlreadyPresent`)
//! - Any other store failure: `CollectError::Store`, counted like transient
//! - A push into a full queue no pool consumes: `CollectError::Frontier`, counted

use crate::models::RecordKind;
use thiserror::Error;

/// Failure of a single logical API fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Authorization or client-error class response; retrying cannot help
    #[error("API rejected {endpoint} with status {status}")]
    Fatal { status: u16, endpoint: String },

    /// Rate limit or server error persisted through every attempt
    #[error("Gave up on {endpoint} after {attempts} attempts (last status {last_status})")]
    Transient {
        endpoint: String,
        attempts: u32,
        last_status: u16,
    },

    /// Request never produced a response (connect failure, timeout)
    #[error("Network error on {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },

    /// Response body was not the expected JSON
    #[error("Could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// Arguments rejected before any request was made
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Fatal { .. })
    }
}

/// A frontier push that did not happen
#[derive(Debug, Error)]
pub enum FrontierError {
    /// The run was cancelled while pushing
    #[error("Frontier closed: run cancelled")]
    Closed,

    /// The queue is full and no pool is left to consume it
    #[error("{kind} queue full ({capacity}) with no pool consuming it")]
    Full { kind: RecordKind, capacity: usize },
}

/// Anything that can go wrong in one fetch/persist cycle
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] tftc_common::Error),

    #[error(transparent)]
    Frontier(#[from] FrontierError),
}

impl CollectError {
    /// Fatal errors stop the run without waiting for the error budget
    pub fn is_fatal(&self) -> bool {
        match self {
            CollectError::Fetch(err) => err.is_fatal(),
            CollectError::Store(_) | CollectError::Frontier(_) => false,
        }
    }
}

/// Why a collector run ended abnormally
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The error sink received its full budget of errors
    #[error("Too many errors ({errors}), stopping")]
    ErrorBudgetExceeded { errors: usize },

    /// A fatal API response was reported
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// The seed's participants did not fit in the summoner queue
    #[error("Could not queue seed participants: {0}")]
    Seed(#[source] FrontierError),

    /// The run was cancelled from outside (Ctrl+C)
    #[error("Run cancelled")]
    Cancelled,

    /// Setup or bookkeeping failure outside the fetch cycles
    #[error(transparent)]
    Common(#[from] tftc_common::Error),
}

/// Result type for collector runs
pub type CollectorResult<T> = Result<T, CollectorError>;
