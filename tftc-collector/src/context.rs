//! Shared run context
//!
//! Everything a worker needs travels in one `CollectorContext` behind an
//! `Arc`: the API client, the record store, the frontier, the error sink, the
//! run-wide cancellation token and the traversal settings.

use crate::config::RunSettings;
use crate::db::RecordStore;
use crate::error_sink::{error_channel, ErrorCollector, ErrorSink};
use crate::frontier::Frontier;
use crate::services::RiotClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct CollectorContext {
    pub client: RiotClient,
    pub store: RecordStore,
    pub frontier: Frontier,
    pub errors: ErrorSink,
    pub cancel: CancellationToken,
    pub settings: RunSettings,
}

impl CollectorContext {
    /// Build a context and the collector for its error sink
    pub fn new(
        client: RiotClient,
        store: RecordStore,
        settings: RunSettings,
        cancel: CancellationToken,
    ) -> (Arc<Self>, ErrorCollector) {
        let (errors, collector) = error_channel(settings.error_budget, cancel.clone());
        let frontier = Frontier::new(settings.queue_capacity, cancel.clone());

        let context = Arc::new(Self {
            client,
            store,
            frontier,
            errors,
            cancel,
            settings,
        });

        (context, collector)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
