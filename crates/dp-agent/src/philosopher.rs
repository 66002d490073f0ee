//! The philosopher state machine.
//!
//! ```text
//! loop until shutdown:
//!   Thinking  sleep think-range          (interruptible)
//!   Hungry    acquire first, then second (each interruptible)
//!   Eating    record meal, sleep eat-range, release second, release first
//! ```

use dp_core::{
    Action, AgentId, AgentRng, EventSender, Phase, ProgressEvent, RunClock, ShutdownSignal,
    SimConfig, StopReason, TimeRange,
};
use dp_ring::{ResourceRing, RingError};

use crate::{AcquireOrder, AgentCell};

/// Everything one philosopher thread needs.  Built by the controller and
/// consumed by [`run`][Self::run] on the philosopher's own thread.
pub struct Philosopher<'a> {
    id:       AgentId,
    cell:     &'a AgentCell,
    ring:     &'a ResourceRing,
    order:    AcquireOrder,
    think:    TimeRange,
    eat:      TimeRange,
    rng:      AgentRng,
    clock:    RunClock,
    shutdown: ShutdownSignal,
    events:   EventSender,
}

impl<'a> Philosopher<'a> {
    pub fn new(
        cell:     &'a AgentCell,
        ring:     &'a ResourceRing,
        config:   &SimConfig,
        clock:    RunClock,
        shutdown: ShutdownSignal,
        events:   EventSender,
    ) -> Self {
        let id = cell.id();
        Self {
            id,
            cell,
            ring,
            order: AcquireOrder::for_agent(id, ring.len()),
            think: config.think,
            eat: config.eat,
            rng: AgentRng::new(config.seed, id),
            clock,
            shutdown,
            events,
        }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Cycle through the phases until shutdown is observed.
    pub fn run(mut self) {
        while !self.shutdown.is_triggered() {
            if !self.cycle() {
                break;
            }
        }
        tracing::debug!(agent = %self.id, meals = self.cell.eat_count(), "left the table");
    }

    /// One Thinking → Hungry → Eating round.  Returns `false` once shutdown
    /// was observed inside it.
    fn cycle(&mut self) -> bool {
        let ring = self.ring;

        // ── Thinking ───────────────────────────────────────────────────────
        self.cell.set_phase(Phase::Thinking);
        self.emit(self.clock.now(), Action::Think);
        let think = self.rng.delay(self.think);
        if self.shutdown.wait_timeout(think) {
            return false;
        }

        // ── Hungry ─────────────────────────────────────────────────────────
        let hungry_at = self.clock.now();
        self.cell.set_phase(Phase::Hungry);
        self.emit(hungry_at, Action::Hungry);

        let (first_slot, first_side) = self.order.first;
        let first = match ring.acquire(first_slot, self.id, &self.shutdown) {
            Ok(guard) => guard,
            Err(e) => return self.abandon(e),
        };
        self.emit(self.clock.now(), Action::PickUp { slot: first_slot, side: first_side });

        let (second_slot, second_side) = self.order.second;
        // On failure `first` is dropped here, which releases it.
        let second = match ring.acquire(second_slot, self.id, &self.shutdown) {
            Ok(guard) => guard,
            Err(e) => return self.abandon(e),
        };
        self.emit(self.clock.now(), Action::PickUp { slot: second_slot, side: second_side });

        // ── Eating ─────────────────────────────────────────────────────────
        let eat_at = self.clock.now();
        self.cell.record_meal(eat_at, eat_at.saturating_sub(hungry_at));
        self.cell.set_phase(Phase::Eating);
        self.emit(eat_at, Action::Eat);

        let eat = self.rng.delay(self.eat);
        let stopped = self.shutdown.wait_timeout(eat);

        second.release();
        self.emit(self.clock.now(), Action::PutDown { slot: second_slot, side: second_side });
        first.release();
        self.emit(self.clock.now(), Action::PutDown { slot: first_slot, side: first_side });

        !stopped
    }

    fn abandon(&self, err: RingError) -> bool {
        match err {
            RingError::Cancelled => {
                tracing::debug!(agent = %self.id, "stopped while hungry");
            }
            other => {
                tracing::error!(agent = %self.id, error = %other, "cannot acquire chopstick");
                self.shutdown.trigger(StopReason::Aborted { thread: self.id.to_string() });
            }
        }
        false
    }

    fn emit(&self, at: std::time::Duration, action: Action) {
        // The reporter may already be gone during shutdown; events are advisory.
        let _ = self.events.send(ProgressEvent::new(at, self.id, action));
    }
}
