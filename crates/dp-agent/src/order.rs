//! Acquisition order: the deadlock-avoidance rule.
//!
//! Even philosophers pick up their left chopstick (slot `id`) first, odd
//! philosophers their right one (slot `(id + 1) mod N`).  If everyone took
//! the left one first, all N could hold one chopstick and wait on their
//! neighbour forever.  Alternating breaks that cycle for the usual timings,
//! but it is not a proof of deadlock freedom; the liveness monitor stays the
//! backstop.

use dp_core::{AgentId, Side, SlotId};

/// The two slots a philosopher needs, in the order it requests them.
/// Releases happen in the reverse order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AcquireOrder {
    pub first:  (SlotId, Side),
    pub second: (SlotId, Side),
}

impl AcquireOrder {
    pub fn for_agent(agent: AgentId, ring_len: usize) -> Self {
        let left = (agent.left_slot(), Side::Left);
        let right = (agent.right_slot(ring_len), Side::Right);
        if agent.0 % 2 == 0 {
            Self { first: left, second: right }
        } else {
            Self { first: right, second: left }
        }
    }
}
