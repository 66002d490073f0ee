//! `ResourceRing` and its RAII `SlotGuard`.
//!
//! # Representation
//!
//! A slot is a `crossbeam` channel of capacity 1.  Holding the slot means
//! having sent your `AgentId` into it: a second sender blocks until the
//! holder takes its id back out on release.  Because the send happens inside
//! `crossbeam::select!` next to the shutdown receiver, a blocked acquisition
//! is woken by shutdown as promptly as by a release.
//!
//! # Instrumentation
//!
//! Every slot also counts acquisitions, releases, and the number of
//! concurrent holders (with its peak).  The holder count is bumped only after
//! the channel admitted the caller and dropped before the channel is
//! drained, so a peak above 1 would mean the exclusion itself failed.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crossbeam::channel::{self, Receiver, Sender};
use dp_core::{AgentId, ShutdownSignal, SlotId};

use crate::{RingError, RingResult};

struct Slot {
    occupied_tx:  Sender<AgentId>,
    occupied_rx:  Receiver<AgentId>,
    holder:       AtomicU32,
    holders:      AtomicUsize,
    peak_holders: AtomicUsize,
    acquisitions: AtomicU64,
    releases:     AtomicU64,
}

impl Slot {
    fn new() -> Self {
        let (occupied_tx, occupied_rx) = channel::bounded(1);
        Self {
            occupied_tx,
            occupied_rx,
            holder:       AtomicU32::new(AgentId::INVALID.0),
            holders:      AtomicUsize::new(0),
            peak_holders: AtomicUsize::new(0),
            acquisitions: AtomicU64::new(0),
            releases:     AtomicU64::new(0),
        }
    }
}

/// Counters for one slot, read with [`ResourceRing::stats`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotStats {
    pub slot:         SlotId,
    pub acquisitions: u64,
    pub releases:     u64,
    /// Highest number of simultaneous holders ever observed.  Always ≤ 1.
    pub peak_holders: usize,
}

/// N exclusive-use slots arranged in a cycle.
///
/// Shared by reference (or `Arc`) between all philosophers of a run.
pub struct ResourceRing {
    slots: Vec<Slot>,
}

impl ResourceRing {
    /// Create a ring of `len` free slots.
    pub fn new(len: usize) -> Self {
        Self { slots: (0..len).map(|_| Slot::new()).collect() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Block until `slot` is free, then hold it for `agent`.
    ///
    /// Returns [`RingError::Cancelled`] if `shutdown` fires first (or had
    /// already fired).  The slot is released when the guard is dropped.
    ///
    /// # Panics
    /// Panics if `agent` already holds `slot`.  Under the acquisition
    /// protocol this cannot happen, and waiting would deadlock the caller on
    /// itself.
    pub fn acquire(
        &self,
        slot:     SlotId,
        agent:    AgentId,
        shutdown: &ShutdownSignal,
    ) -> RingResult<SlotGuard<'_>> {
        let s = self.slot(slot)?;
        assert_ne!(
            s.holder.load(Ordering::Acquire),
            agent.0,
            "{agent} tried to acquire {slot} while already holding it",
        );
        if shutdown.is_triggered() {
            return Err(RingError::Cancelled);
        }

        let sent = crossbeam::select! {
            send(s.occupied_tx, agent) -> res => res.is_ok(),
            recv(shutdown.cancelled()) -> _ => return Err(RingError::Cancelled),
        };
        if !sent {
            return Err(RingError::Disconnected(slot));
        }

        s.holder.store(agent.0, Ordering::Release);
        let holding = s.holders.fetch_add(1, Ordering::AcqRel) + 1;
        s.peak_holders.fetch_max(holding, Ordering::AcqRel);
        s.acquisitions.fetch_add(1, Ordering::Relaxed);
        let guard = SlotGuard { ring: self, slot, agent };

        // `select!` picks at random when the slot frees up after shutdown;
        // a stopped run must not hand out slots.
        if shutdown.is_triggered() {
            drop(guard);
            return Err(RingError::Cancelled);
        }
        tracing::trace!(%agent, %slot, "acquired");
        Ok(guard)
    }

    /// Current holder of `slot`, if any.
    pub fn holder(&self, slot: SlotId) -> Option<AgentId> {
        let raw = self.slots.get(slot.index())?.holder.load(Ordering::Acquire);
        (raw != AgentId::INVALID.0).then_some(AgentId(raw))
    }

    /// Snapshot of every slot's counters.
    pub fn stats(&self) -> Vec<SlotStats> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| SlotStats {
                slot:         SlotId(i as u32),
                acquisitions: s.acquisitions.load(Ordering::Acquire),
                releases:     s.releases.load(Ordering::Acquire),
                peak_holders: s.peak_holders.load(Ordering::Acquire),
            })
            .collect()
    }

    fn slot(&self, slot: SlotId) -> RingResult<&Slot> {
        self.slots
            .get(slot.index())
            .ok_or(RingError::SlotOutOfRange { slot, len: self.slots.len() })
    }

    fn release(&self, slot: SlotId, agent: AgentId) {
        let s = &self.slots[slot.index()];
        s.holder.store(AgentId::INVALID.0, Ordering::Release);
        s.holders.fetch_sub(1, Ordering::AcqRel);
        s.releases.fetch_add(1, Ordering::Relaxed);
        // Freeing the channel last lets the next waiter in.
        let freed = s.occupied_rx.try_recv();
        debug_assert_eq!(freed.ok(), Some(agent), "{slot} released by a non-holder");
        tracing::trace!(%agent, %slot, "released");
    }
}

/// Proof that an agent holds a slot.  Dropping it releases the slot.
#[must_use = "dropping the guard releases the slot immediately"]
pub struct SlotGuard<'a> {
    ring:  &'a ResourceRing,
    slot:  SlotId,
    agent: AgentId,
}

impl SlotGuard<'_> {
    #[inline]
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    /// Release the slot now.  Equivalent to dropping the guard.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.ring.release(self.slot, self.agent);
    }
}
