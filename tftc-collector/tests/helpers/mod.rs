//! Test Helper Utilities
//!
//! Shared utilities for testing tftc-collector: a scripted transport standing
//! in for the Riot API, canned API documents and context builders.

#![allow(dead_code)]

pub mod fixtures;
pub mod scripted_transport;

pub use fixtures::*;
pub use scripted_transport::{Call, ScriptedTransport};

use std::sync::Arc;
use std::time::Duration;
use tftc_collector::config::{ApiConfig, RateLimitConfig, RetryConfig, RunSettings};
use tftc_collector::error_sink::ErrorCollector;
use tftc_collector::services::RiotClient;
use tftc_collector::{CollectorContext, RecordStore};
use tokio_util::sync::CancellationToken;

/// Limiter generous enough that it never delays a test
pub fn unthrottled() -> RateLimitConfig {
    RateLimitConfig {
        requests_per_second: 10_000,
        burst: 10_000,
    }
}

/// Single attempt, so transient failures surface without backoff sleeps
pub fn single_attempt() -> RetryConfig {
    RetryConfig {
        max_attempts: 1,
        ..RetryConfig::default()
    }
}

pub fn test_client(transport: Arc<ScriptedTransport>, retry: RetryConfig) -> RiotClient {
    RiotClient::with_transport(transport, ApiConfig::default(), unthrottled(), retry)
        .expect("valid client config")
}

/// Small, fast traversal settings
pub fn test_run_settings() -> RunSettings {
    RunSettings {
        worker_count: 4,
        cycle_budget: 64,
        queue_capacity: 2000,
        error_budget: 5,
        match_history_count: 20,
        drain_interval: Duration::from_millis(1),
        idle_poll: Duration::from_millis(10),
    }
}

pub fn test_context(
    transport: Arc<ScriptedTransport>,
    store: RecordStore,
    settings: RunSettings,
    retry: RetryConfig,
) -> (Arc<CollectorContext>, ErrorCollector) {
    CollectorContext::new(
        test_client(transport, retry),
        store,
        settings,
        CancellationToken::new(),
    )
}
