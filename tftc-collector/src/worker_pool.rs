//! Worker pools
//!
//! One pool per record kind. Each worker repeats a single cycle: pop a key,
//! resolve it, queue its unseen neighbors. Workers share a cycle budget and
//! stop when it is spent, when the frontier is exhausted, or when the run is
//! cancelled.

use crate::context::CollectorContext;
use crate::models::RecordKind;
use crate::resolver::resolve;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// What one pool run accomplished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    pub kind: RecordKind,
    /// Cycles that popped and processed a key
    pub cycles: usize,
}

/// Take one cycle from the shared budget
fn claim_cycle(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

/// Run `worker_count` workers over the `kind` queue until the pool is done
pub async fn run_pool(ctx: Arc<CollectorContext>, kind: RecordKind) -> PoolReport {
    let budget = Arc::new(AtomicUsize::new(ctx.settings.cycle_budget));
    let completed = Arc::new(AtomicUsize::new(0));

    info!(
        kind = %kind,
        workers = ctx.settings.worker_count,
        cycle_budget = ctx.settings.cycle_budget,
        "Starting worker pool"
    );

    let mut workers = JoinSet::new();
    for worker_id in 0..ctx.settings.worker_count {
        let ctx = Arc::clone(&ctx);
        let budget = Arc::clone(&budget);
        let completed = Arc::clone(&completed);
        workers.spawn(async move {
            while claim_cycle(&budget) {
                if !run_cycle(&ctx, kind).await {
                    debug!(kind = %kind, worker_id, "Worker stopping");
                    break;
                }
                completed.fetch_add(1, Ordering::SeqCst);
            }
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!(kind = %kind, "Worker task failed: {}", e);
        }
    }

    // Idle workers of the other pool stop waiting on this queue's leftovers
    ctx.frontier.queue(kind).mark_unattended();

    let report = PoolReport {
        kind,
        cycles: completed.load(Ordering::SeqCst),
    };
    info!(kind = %kind, cycles = report.cycles, "Worker pool finished");
    report
}

/// One pop → resolve → enqueue cycle; false when there was nothing to pop
async fn run_cycle(ctx: &CollectorContext, kind: RecordKind) -> bool {
    let Some(entry) = ctx
        .frontier
        .pop_or_exhausted(kind, ctx.settings.idle_poll)
        .await
    else {
        return false;
    };

    match resolve(ctx, kind, entry.key()).await {
        Ok(neighbors) => {
            let target = kind.neighbor();
            for key in neighbors {
                if ctx.is_cancelled() {
                    break;
                }
                if let Err(e) = ctx.frontier.enqueue_if_unseen(&ctx.store, target, key).await {
                    ctx.errors.report(e);
                }
            }
        }
        Err(e) => ctx.errors.report(e),
    }

    // Neighbors are queued before the claim is released
    drop(entry);
    true
}
