//! Collector run state machine
//!
//! Seeding → ParallelDraining → SequentialDraining → Idle
//!
//! Any state may move to Aborted when the run is cancelled.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a collector run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    /// Resolving the seed match and enqueueing its participants
    Seeding,
    /// Both worker pools running
    ParallelDraining,
    /// Single loop emptying what the pools left behind
    SequentialDraining,
    /// Both frontiers empty, run finished normally
    Idle,
    /// Run cancelled (error budget, fatal API response, or signal)
    Aborted,
}

impl RunState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Seeding, ParallelDraining)
                | (ParallelDraining, SequentialDraining)
                | (SequentialDraining, Idle)
                | (Seeding | ParallelDraining | SequentialDraining, Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Idle | RunState::Aborted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Seeding => "SEEDING",
            RunState::ParallelDraining => "PARALLEL_DRAINING",
            RunState::SequentialDraining => "SEQUENTIAL_DRAINING",
            RunState::Idle => "IDLE",
            RunState::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// Summary logged at the end of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub summoners_stored: i64,
    pub matches_stored: i64,
    /// Errors delivered to the error sink during the run
    pub errors_reported: usize,
    pub final_state: RunState,
}
