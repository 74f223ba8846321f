//! Collector run orchestration
//!
//! Seeding → ParallelDraining → SequentialDraining → Idle
//!
//! The seed match is resolved directly and its participants queued. Both
//! worker pools then run concurrently until their budgets are spent or the
//! frontier is exhausted. Whatever is still queued is resolved one key at a
//! time, without exploring further, until both queues are empty.

use crate::context::CollectorContext;
use crate::error::{CollectorError, CollectorResult, FrontierError};
use crate::error_sink::ErrorCollector;
use crate::models::{RecordKind, RunState, RunSummary};
use crate::resolver::{resolve, resolve_match};
use crate::worker_pool::run_pool;
use std::sync::Arc;
use tracing::{info, warn};

/// Drives one collector run
pub struct Collector {
    ctx: Arc<CollectorContext>,
    errors: ErrorCollector,
    seed_match_id: String,
}

impl Collector {
    /// `ctx` must be the only reference to the context: the run ends once the
    /// error collector sees every sink dropped.
    pub fn new(ctx: Arc<CollectorContext>, errors: ErrorCollector, seed_match_id: String) -> Self {
        Self {
            ctx,
            errors,
            seed_match_id,
        }
    }

    /// Run the traversal to completion
    ///
    /// Returns the summary on a normal finish, or why the run was stopped.
    pub async fn run(self) -> CollectorResult<RunSummary> {
        let Collector {
            ctx,
            errors,
            seed_match_id,
        } = self;

        ctx.settings.validate()?;

        let error_task = tokio::spawn(errors.run());
        let store = ctx.store.clone();

        let mut phases = Phases {
            ctx,
            seed_match_id,
            state: RunState::Seeding,
        };
        let driven = phases.drive().await;
        if !phases.state.is_terminal() {
            phases.transition(RunState::Aborted);
        }
        let final_state = phases.state;

        // Dropping the last context releases the last error sink
        drop(phases);
        let report = error_task
            .await
            .map_err(|e| tftc_common::Error::Internal(format!("Error collector failed: {}", e)))?;

        driven?;
        if let Some(reason) = report.stop {
            return Err(reason.into());
        }
        if final_state == RunState::Aborted {
            return Err(CollectorError::Cancelled);
        }

        let summary = RunSummary {
            summoners_stored: store.count(RecordKind::Summoner).await?,
            matches_stored: store.count(RecordKind::Match).await?,
            errors_reported: report.received,
            final_state,
        };
        info!(
            summoners = summary.summoners_stored,
            matches = summary.matches_stored,
            errors = summary.errors_reported,
            "Run complete"
        );

        Ok(summary)
    }
}

struct Phases {
    ctx: Arc<CollectorContext>,
    seed_match_id: String,
    state: RunState,
}

impl Phases {
    fn transition(&mut self, next: RunState) {
        if !self.state.can_transition_to(next) {
            warn!("Ignoring run state change {} -> {}", self.state, next);
            return;
        }
        info!("Run state: {} -> {}", self.state, next);
        self.state = next;
    }

    async fn drive(&mut self) -> CollectorResult<()> {
        self.seed().await?;
        if self.ctx.is_cancelled() {
            return Ok(());
        }

        self.transition(RunState::ParallelDraining);
        let (summoners, matches) = tokio::join!(
            run_pool(Arc::clone(&self.ctx), RecordKind::Summoner),
            run_pool(Arc::clone(&self.ctx), RecordKind::Match),
        );
        info!(
            summoner_cycles = summoners.cycles,
            match_cycles = matches.cycles,
            "Parallel phase finished"
        );
        if self.ctx.is_cancelled() {
            return Ok(());
        }

        self.transition(RunState::SequentialDraining);
        if self.drain().await {
            self.transition(RunState::Idle);
        }
        Ok(())
    }

    /// Queue the seed's participants; fails if they overflow the queue
    async fn seed(&mut self) -> CollectorResult<()> {
        info!(match_id = %self.seed_match_id, "Seeding from match");

        // A seed stored by an earlier run still yields its participants
        let participants = match self.ctx.store.get_match(&self.seed_match_id).await {
            Ok(Some(stored)) => stored.participants,
            Ok(None) => match resolve_match(&self.ctx, &self.seed_match_id).await {
                Ok(participants) => participants,
                Err(e) => {
                    self.ctx.errors.report(e);
                    return Ok(());
                }
            },
            Err(e) => {
                self.ctx.errors.report(e.into());
                return Ok(());
            }
        };

        // No pool runs yet, so a full queue would never drain
        let queue = self.ctx.frontier.queue(RecordKind::Summoner);
        for puuid in participants {
            match self.ctx.store.exists(RecordKind::Summoner, &puuid).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    self.ctx.errors.report(e.into());
                    continue;
                }
            }
            match queue.try_push(puuid) {
                Ok(()) | Err(FrontierError::Closed) => {}
                Err(e) => return Err(CollectorError::Seed(e)),
            }
        }
        Ok(())
    }

    /// Resolve queued keys one at a time; false if cancelled first
    async fn drain(&mut self) -> bool {
        let interval = self.ctx.settings.drain_interval;

        loop {
            if self.ctx.is_cancelled() {
                return false;
            }
            if self.ctx.frontier.is_empty() {
                return true;
            }

            let next = RecordKind::ALL.into_iter().find_map(|kind| {
                self.ctx
                    .frontier
                    .queue(kind)
                    .try_pop()
                    .map(|entry| (kind, entry))
            });
            let Some((kind, entry)) = next else {
                tokio::task::yield_now().await;
                continue;
            };

            tokio::select! {
                _ = self.ctx.cancel.cancelled() => return false,
                _ = tokio::time::sleep(interval) => {}
            }

            // Neighbors are dropped: the drain only empties the frontier
            if let Err(e) = resolve(&self.ctx, kind, entry.key()).await {
                self.ctx.errors.report(e);
            }
        }
    }
}
