//! Run time model.
//!
//! # Design
//!
//! Every timestamp in a run is a `Duration` measured from a single monotonic
//! epoch held by [`RunClock`].  Agents publish timestamps to other threads as
//! `u64` nanoseconds since that epoch, which fits an atomic and never goes
//! backwards.  A `u64` of nanoseconds lasts ~584 years.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{DpError, DpResult};

// ── RunClock ──────────────────────────────────────────────────────────────────

/// Monotonic clock anchored at the start of a run.
///
/// `RunClock` is `Copy` and shared by reference with every thread of the run.
#[derive(Copy, Clone, Debug)]
pub struct RunClock {
    epoch: Instant,
}

impl RunClock {
    /// Start a clock at the current instant.
    pub fn start() -> Self {
        Self { epoch: Instant::now() }
    }

    /// The instant the run started.
    #[inline]
    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Time elapsed since the run started.
    #[inline]
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Offset of `instant` from the run start (zero if it precedes the start).
    #[inline]
    pub fn since_start(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(self.epoch)
    }

    /// Current offset as nanoseconds, the representation stored in atomics.
    #[inline]
    pub fn now_nanos(&self) -> u64 {
        to_nanos(self.now())
    }
}

/// Saturating `Duration` → `u64` nanoseconds.
#[inline]
pub fn to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

// ── TimeRange ─────────────────────────────────────────────────────────────────

/// An inclusive `[min, max]` interval of seconds from which delays are drawn.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl TimeRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Reject negative, non-finite, or inverted bounds.  `what` names the
    /// range in the error message.
    pub fn validate(&self, what: &str) -> DpResult<()> {
        if !self.min_secs.is_finite() || !self.max_secs.is_finite() {
            return Err(DpError::Config(format!("{what}: bounds must be finite")));
        }
        if self.min_secs < 0.0 {
            return Err(DpError::Config(format!("{what}: minimum must not be negative")));
        }
        if Duration::try_from_secs_f64(self.max_secs).is_err() {
            return Err(DpError::Config(format!(
                "{what}: maximum {} s is too large",
                self.max_secs
            )));
        }
        if self.min_secs > self.max_secs {
            return Err(DpError::Config(format!(
                "{what}: minimum {} exceeds maximum {}",
                self.min_secs, self.max_secs
            )));
        }
        Ok(())
    }
}
