//! Error fan-in
//!
//! Workers hand every cycle failure to an `ErrorSink`; a single
//! `ErrorCollector` task counts them. When the count reaches the budget, or
//! a fatal error arrives, it cancels the run. Counting continues until every
//! sink is dropped so the final report covers the whole run.

use crate::error::{CollectError, CollectorError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Cloneable handle for reporting cycle failures
#[derive(Clone)]
pub struct ErrorSink {
    sender: mpsc::UnboundedSender<CollectError>,
}

impl ErrorSink {
    /// Report a failure; never blocks
    pub fn report(&self, err: CollectError) {
        // The collector only exits after every sink is gone
        let _ = self.sender.send(err);
    }
}

/// Why the error collector stopped the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    BudgetExceeded { errors: usize },
    Fatal(String),
}

impl From<StopReason> for CollectorError {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::BudgetExceeded { errors } => CollectorError::ErrorBudgetExceeded { errors },
            StopReason::Fatal(message) => CollectorError::Fatal(message),
        }
    }
}

/// What the collector saw over the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Errors received, including any after the stop
    pub received: usize,
    /// First reason the run was stopped, if any
    pub stop: Option<StopReason>,
}

/// Receiving end of the error channel
pub struct ErrorCollector {
    receiver: mpsc::UnboundedReceiver<CollectError>,
    budget: usize,
    cancel: CancellationToken,
}

/// Create a sink/collector pair with the given error budget
pub fn error_channel(budget: usize, cancel: CancellationToken) -> (ErrorSink, ErrorCollector) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        ErrorSink { sender },
        ErrorCollector {
            receiver,
            budget,
            cancel,
        },
    )
}

impl ErrorCollector {
    /// Count errors until every `ErrorSink` is dropped
    pub async fn run(mut self) -> ErrorReport {
        let mut received = 0usize;
        let mut stop: Option<StopReason> = None;

        while let Some(err) = self.receiver.recv().await {
            received += 1;
            error!(
                "received error \"{}\", {}/{} before stopping",
                err, received, self.budget
            );

            if stop.is_some() {
                continue;
            }

            if err.is_fatal() {
                error!("Fatal error, stopping the run");
                stop = Some(StopReason::Fatal(err.to_string()));
                self.cancel.cancel();
            } else if received >= self.budget {
                error!("Too many errors ({}), stopping the run", received);
                stop = Some(StopReason::BudgetExceeded { errors: received });
                self.cancel.cancel();
            }
        }

        ErrorReport { received, stop }
    }
}
