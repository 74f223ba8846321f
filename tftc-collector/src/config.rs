//! Configuration resolution for tftc-collector
//!
//! Provides multi-tier resolution with CLI → ENV → TOML → default priority.
//! The TOML file maps onto `CollectorConfig`; `resolve_settings` folds the
//! command-line overrides and environment in and validates the result.

use governor::Quota;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tftc_common::config::{resolve_database_path, resolve_string, ConfigSource};
use tftc_common::time::millis_to_duration;
use tftc_common::{Error, Result};
use tracing::{info, warn};

/// API key environment variable
pub const API_KEY_ENV: &str = "RGAPIKEY";
/// Database path environment variable
pub const DATABASE_ENV: &str = "TFTC_DATABASE";
/// Config file environment variable
pub const CONFIG_ENV: &str = "TFTC_CONFIG";
/// Seed match environment variable
pub const SEED_ENV: &str = "TFTC_SEED_MATCH";

/// Match the traversal starts from when nothing else is configured
pub const DEFAULT_SEED_MATCH: &str = "NA1_4092101718";

/// Players in a TFT lobby
pub const MATCH_PARTICIPANTS: usize = 8;

/// Longest `Retry-After` honoured, in seconds
pub const MAX_RETRY_AFTER_SECS: u64 = 3600;

/// Contents of the TOML config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub api_key: Option<String>,
    pub database_path: Option<PathBuf>,
    pub seed_match_id: Option<String>,
    pub worker_count: usize,
    pub cycle_budget: usize,
    pub queue_capacity: usize,
    pub error_budget: usize,
    pub match_history_count: u32,
    pub drain_interval_ms: u64,
    pub idle_poll_ms: u64,
    pub api: ApiConfig,
    pub rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    pub store: StoreConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        let run = RunSettings::default();
        Self {
            api_key: None,
            database_path: None,
            seed_match_id: None,
            worker_count: run.worker_count,
            cycle_budget: run.cycle_budget,
            queue_capacity: run.queue_capacity,
            error_budget: run.error_budget,
            match_history_count: run.match_history_count,
            drain_interval_ms: run.drain_interval.as_millis() as u64,
            idle_poll_ms: run.idle_poll.as_millis() as u64,
            api: ApiConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// API hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Platform host (summoner and league endpoints)
    pub platform_url: String,
    /// Regional host (match endpoints)
    pub region_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            platform_url: "https://na1.api.riotgames.com".to_string(),
            region_url: "https://americas.api.riotgames.com".to_string(),
        }
    }
}

/// Token bucket shared by every outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 4/s with a burst of 4 keeps a development key under 100 per 2 minutes
        Self {
            requests_per_second: 4,
            burst: 4,
        }
    }
}

impl RateLimitConfig {
    pub fn quota(&self) -> Result<Quota> {
        let rate = NonZeroU32::new(self.requests_per_second).ok_or_else(|| {
            Error::Config("rate_limit.requests_per_second must be greater than 0".to_string())
        })?;
        let burst = NonZeroU32::new(self.burst)
            .ok_or_else(|| Error::Config("rate_limit.burst must be greater than 0".to_string()))?;

        Ok(Quota::per_second(rate).allow_burst(burst))
    }
}

/// Per-request retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    /// Used when a 429 carries no parseable `Retry-After`
    pub default_retry_after_secs: u64,
    /// Added to every 429 wait
    pub retry_margin_secs: u64,
    /// Wait after a 5xx response
    pub server_error_cooldown_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_retry_after_secs: 15,
            retry_margin_secs: 5,
            server_error_cooldown_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

impl RetryConfig {
    /// Wait after a 429 on `attempt` (1-based): `retry_after * attempt + margin`
    pub fn rate_limit_wait(&self, retry_after: Option<&str>, attempt: u32) -> Duration {
        let suggested = retry_after
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(self.default_retry_after_secs)
            .min(MAX_RETRY_AFTER_SECS);

        Duration::from_secs(
            suggested
                .saturating_mul(u64::from(attempt))
                .saturating_add(self.retry_margin_secs),
        )
    }

    pub fn server_error_cooldown(&self) -> Duration {
        Duration::from_secs(self.server_error_cooldown_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Store tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on retrying a write that hit "database is locked"
    pub max_lock_wait_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_lock_wait_ms: 5000,
        }
    }
}

/// Traversal tuning used by the pools and the drain loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Worker units per pool
    pub worker_count: usize,
    /// Cycles each pool services before the sequential drain takes over
    pub cycle_budget: usize,
    /// Capacity of each frontier queue
    pub queue_capacity: usize,
    /// Errors tolerated before the run is shut down
    pub error_budget: usize,
    /// Match ids requested per summoner
    pub match_history_count: u32,
    /// Pause before each item of the sequential drain
    pub drain_interval: Duration,
    /// How often an idle worker checks whether the frontier is exhausted
    pub idle_poll: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            worker_count: 64,
            cycle_budget: 64,
            queue_capacity: 40_000,
            error_budget: 5,
            match_history_count: 20,
            drain_interval: Duration::from_millis(300),
            idle_poll: Duration::from_millis(250),
        }
    }
}

impl RunSettings {
    /// Most keys one queue can ever hold in a run
    ///
    /// The seed queues at most one lobby of participants, and every pool
    /// cycle routes at most `max(match_history_count, MATCH_PARTICIPANTS)`
    /// neighbors.
    pub fn max_queued(&self) -> usize {
        let per_cycle = (self.match_history_count as usize).max(MATCH_PARTICIPANTS);
        self.cycle_budget
            .saturating_mul(per_cycle)
            .saturating_add(MATCH_PARTICIPANTS)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(Error::Config("worker_count must be greater than 0".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::Config("queue_capacity must be greater than 0".to_string()));
        }
        if self.queue_capacity < self.max_queued() {
            return Err(Error::Config(format!(
                "queue_capacity {} is below the {} keys a run of {} cycles can queue",
                self.queue_capacity,
                self.max_queued(),
                self.cycle_budget
            )));
        }
        if self.error_budget == 0 {
            return Err(Error::Config("error_budget must be greater than 0".to_string()));
        }
        if self.idle_poll.is_zero() {
            return Err(Error::Config("idle_poll_ms must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Values supplied on the command line (each overrides ENV and TOML)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub database_path: Option<PathBuf>,
    pub seed_match_id: Option<String>,
    pub worker_count: Option<usize>,
    pub cycle_budget: Option<usize>,
    pub reset_store: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub database_path: PathBuf,
    pub seed_match_id: String,
    pub reset_store: bool,
    pub run: RunSettings,
    pub api: ApiConfig,
    pub rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    pub store: StoreConfig,
}

/// Fold CLI overrides, environment and TOML config into validated settings
///
/// A missing API key is fatal: nothing can be fetched without one.
pub fn resolve_settings(cli: &CliOverrides, toml_config: CollectorConfig) -> Result<Settings> {
    let (api_key, key_source) = resolve_string(
        cli.api_key.as_deref(),
        API_KEY_ENV,
        toml_config.api_key.as_deref(),
    )
    .ok_or_else(|| {
        Error::Config(format!(
            "Riot API key not configured. Please configure using one of:\n\
             1. Command line: --api-key RGAPI-...\n\
             2. Environment: {}=RGAPI-...\n\
             3. TOML config: api_key = \"RGAPI-...\"",
            API_KEY_ENV
        ))
    })?;
    info!("API key loaded from {}", key_source);

    let (database_path, db_source) = resolve_database_path(
        cli.database_path.as_deref(),
        DATABASE_ENV,
        toml_config.database_path.as_deref(),
    );
    info!("Database path {} (from {})", database_path.display(), db_source);

    let (seed_match_id, seed_source) = resolve_string(
        cli.seed_match_id.as_deref(),
        SEED_ENV,
        toml_config.seed_match_id.as_deref(),
    )
    .unwrap_or_else(|| (DEFAULT_SEED_MATCH.to_string(), ConfigSource::Default));
    info!("Seed match {} (from {})", seed_match_id, seed_source);

    let run = RunSettings {
        worker_count: cli.worker_count.unwrap_or(toml_config.worker_count),
        cycle_budget: cli.cycle_budget.unwrap_or(toml_config.cycle_budget),
        queue_capacity: toml_config.queue_capacity,
        error_budget: toml_config.error_budget,
        match_history_count: toml_config.match_history_count,
        drain_interval: millis_to_duration(toml_config.drain_interval_ms),
        idle_poll: millis_to_duration(toml_config.idle_poll_ms),
    };
    run.validate()?;

    if run.cycle_budget == 0 {
        warn!("cycle_budget is 0: worker pools will not run, only the sequential drain");
    }

    // Validates the quota as a side effect
    toml_config.rate_limit.quota()?;

    if toml_config.retry.max_attempts == 0 {
        return Err(Error::Config("retry.max_attempts must be greater than 0".to_string()));
    }

    Ok(Settings {
        api_key,
        database_path,
        seed_match_id,
        reset_store: cli.reset_store,
        run,
        api: toml_config.api,
        rate_limit: toml_config.rate_limit,
        retry: toml_config.retry,
        store: toml_config.store,
    })
}

/// API key with everything but the prefix masked, for logging
pub fn redact_key(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    format!("{}…", visible)
}
