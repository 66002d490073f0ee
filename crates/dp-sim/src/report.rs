//! Final statistics.

use std::time::Duration;

use dp_agent::AgentCell;
use dp_core::{AgentId, StopReason};
use dp_ring::SlotStats;

/// Final statistics for one philosopher.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AgentRecord {
    pub id:         AgentId,
    /// Longest Hungry phase that ended in a meal.
    pub max_hungry: Duration,
    pub eat_count:  u64,
}

impl AgentRecord {
    #[inline]
    pub fn max_hungry_secs(&self) -> f64 {
        self.max_hungry.as_secs_f64()
    }
}

/// Everything a finished run hands to reporting and persistence.
///
/// The shape is the same whatever stopped the run; only `reason` differs.
#[derive(Clone, Debug)]
pub struct SimReport {
    pub reason:        StopReason,
    /// Offset from the run start at which shutdown was triggered.
    pub stopped_after: Duration,
    /// One record per philosopher, in id order.
    pub records:       Vec<AgentRecord>,
    /// Ring instrumentation, one entry per slot.
    pub slots:         Vec<SlotStats>,
    /// Names of worker threads that panicked.  Empty for a clean run.
    pub panicked:      Vec<String>,
}

impl SimReport {
    pub fn starved(&self) -> bool {
        matches!(self.reason, StopReason::Starvation { .. })
    }

    pub fn total_meals(&self) -> u64 {
        self.records.iter().map(|r| r.eat_count).sum()
    }
}

/// Turn the cells of a finished run into records.
///
/// Takes the cells by value: the caller can only have them once every
/// philosopher borrowing them has been joined, so no field can tear.
pub fn collect_stats(cells: Vec<AgentCell>) -> Vec<AgentRecord> {
    let mut records: Vec<AgentRecord> = cells
        .into_iter()
        .map(|cell| {
            let snap = cell.into_snapshot();
            AgentRecord {
                id:         snap.id,
                max_hungry: snap.max_wait,
                eat_count:  snap.eat_count,
            }
        })
        .collect();
    records.sort_by_key(|r| r.id);
    records
}
