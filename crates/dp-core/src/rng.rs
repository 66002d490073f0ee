//! Deterministic per-agent RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each philosopher gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//!
//! Thread interleaving is still up to the OS scheduler, so two runs with the
//! same seed do not produce the same event order.  What *is* reproducible is
//! the sequence of think/eat delays each philosopher draws.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, TimeRange};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG.
///
/// Moved into the philosopher's thread at spawn time and never shared.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Draw a delay uniformly from `range` (both ends inclusive).
    ///
    /// Bounds too large for a `Duration` saturate; a validated range never
    /// has them.
    pub fn delay(&mut self, range: TimeRange) -> Duration {
        let secs = if range.max_secs <= range.min_secs {
            range.min_secs
        } else {
            self.0.gen_range(range.min_secs..=range.max_secs)
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}
