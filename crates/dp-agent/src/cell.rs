//! Per-philosopher state published to other threads.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use dp_core::time::to_nanos;
use dp_core::{AgentId, Phase};

/// Single-writer, multi-reader state of one philosopher.
///
/// Timestamps are nanoseconds since the run's [`RunClock`] epoch.  Writers
/// store with `Release` and readers load with `Acquire`, so the monitor never
/// sees a progress timestamp older than the last meal that completed its
/// store.
///
/// [`RunClock`]: dp_core::RunClock
#[derive(Debug)]
pub struct AgentCell {
    id:                  AgentId,
    phase:               AtomicU8,
    last_progress_nanos: AtomicU64,
    eat_count:           AtomicU64,
    max_wait_nanos:      AtomicU64,
}

impl AgentCell {
    /// A thinking philosopher whose last progress is the run start.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            phase:               AtomicU8::new(Phase::Thinking as u8),
            last_progress_nanos: AtomicU64::new(0),
            eat_count:           AtomicU64::new(0),
            max_wait_nanos:      AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    /// When the last meal started.
    pub fn last_progress(&self) -> Duration {
        Duration::from_nanos(self.last_progress_nanos.load(Ordering::Acquire))
    }

    pub fn eat_count(&self) -> u64 {
        self.eat_count.load(Ordering::Acquire)
    }

    /// Longest Hungry phase so far.
    pub fn max_wait(&self) -> Duration {
        Duration::from_nanos(self.max_wait_nanos.load(Ordering::Acquire))
    }

    /// Publish the start of a meal at `now` after waiting `waited`.
    ///
    /// Only the owning philosopher calls this.
    pub fn record_meal(&self, now: Duration, waited: Duration) {
        self.max_wait_nanos.fetch_max(to_nanos(waited), Ordering::AcqRel);
        self.eat_count.fetch_add(1, Ordering::AcqRel);
        self.last_progress_nanos.store(to_nanos(now), Ordering::Release);
    }

    /// Consume the cell.  Taking it by value proves no thread can still be
    /// writing to it.
    pub fn into_snapshot(self) -> CellSnapshot {
        CellSnapshot {
            id:            self.id,
            eat_count:     self.eat_count.into_inner(),
            max_wait:      Duration::from_nanos(self.max_wait_nanos.into_inner()),
            last_progress: Duration::from_nanos(self.last_progress_nanos.into_inner()),
        }
    }
}

/// Final, plain-data view of an [`AgentCell`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellSnapshot {
    pub id:            AgentId,
    pub eat_count:     u64,
    pub max_wait:      Duration,
    pub last_progress: Duration,
}
