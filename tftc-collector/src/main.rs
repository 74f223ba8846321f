//! tftc-collector - TFT match graph collector
//!
//! Starts from a seed match, alternately resolving participants and matches
//! through the Riot API, and stores every summoner and match once.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tftc_collector::config::{
    redact_key, resolve_settings, CliOverrides, CollectorConfig, CONFIG_ENV,
};
use tftc_collector::models::RunState;
use tftc_collector::services::RiotClient;
use tftc_collector::{Collector, CollectorContext, CollectorError, RecordStore};
use tftc_common::config::{load_toml_config, resolve_config_path};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for tftc-collector
#[derive(Parser, Debug)]
#[command(name = "tftc-collector")]
#[command(about = "Collects TFT summoners and matches by walking the match graph")]
#[command(version)]
struct Args {
    /// Riot API key (falls back to RGAPIKEY, then the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Match id to start from
    #[arg(short, long)]
    seed: Option<String>,

    /// Workers per pool
    #[arg(long)]
    workers: Option<usize>,

    /// Cycles each pool runs before the sequential drain
    #[arg(long)]
    cycles: Option<usize>,

    /// Delete stored records before collecting
    #[arg(long)]
    reset: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "tftc_collector=info,tftc_common=info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tftc-collector v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
    );

    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV);
    let toml_config: CollectorConfig =
        load_toml_config(config_path.as_deref()).context("Failed to load config file")?;

    let overrides = CliOverrides {
        api_key: args.api_key,
        database_path: args.database,
        seed_match_id: args.seed,
        worker_count: args.workers,
        cycle_budget: args.cycles,
        reset_store: args.reset,
    };
    let settings =
        resolve_settings(&overrides, toml_config).context("Invalid configuration")?;

    info!(
        api_key = %redact_key(&settings.api_key),
        workers = settings.run.worker_count,
        cycle_budget = settings.run.cycle_budget,
        queue_capacity = settings.run.queue_capacity,
        error_budget = settings.run.error_budget,
        requests_per_second = settings.rate_limit.requests_per_second,
        burst = settings.rate_limit.burst,
        "Settings resolved"
    );

    let store = RecordStore::open(&settings.database_path, &settings.store)
        .await
        .context("Failed to open database")?;
    if settings.reset_store {
        warn!("Resetting stored records");
        store.reset().await.context("Failed to reset database")?;
    }

    let client = RiotClient::new(&settings).context("Failed to build API client")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let (ctx, errors) = CollectorContext::new(client, store, settings.run, cancel);
    let collector = Collector::new(ctx, errors, settings.seed_match_id);

    match collector.run().await {
        Ok(summary) if summary.final_state == RunState::Idle => {
            info!(
                "Done: {} summoners, {} matches stored ({} errors)",
                summary.summoners_stored, summary.matches_stored, summary.errors_reported
            );
            Ok(())
        }
        Ok(summary) => {
            error!("Run ended in state {}", summary.final_state);
            std::process::exit(1);
        }
        Err(CollectorError::Cancelled) => {
            warn!("Run cancelled");
            std::process::exit(1);
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Cancel the run on Ctrl+C
async fn cancel_on_signal(cancel: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, shutting down");
            cancel.cancel();
        }
        Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
    }
}
