//! Starvation and time-budget polling.

use std::time::Duration;

use dp_agent::AgentCell;
use dp_core::{Action, EventSender, ProgressEvent, RunClock, ShutdownSignal, SimConfig, StopReason};

/// Watchdog over a run's philosophers.
pub struct LivenessMonitor<'a> {
    cells:          &'a [AgentCell],
    clock:          RunClock,
    shutdown:       ShutdownSignal,
    events:         EventSender,
    hunger_timeout: Duration,
    duration:       Duration,
    poll_interval:  Duration,
}

impl<'a> LivenessMonitor<'a> {
    pub fn new(
        cells:    &'a [AgentCell],
        config:   &SimConfig,
        clock:    RunClock,
        shutdown: ShutdownSignal,
        events:   EventSender,
    ) -> Self {
        Self {
            cells,
            clock,
            shutdown,
            events,
            hunger_timeout: config.hunger_timeout(),
            duration:       config.duration(),
            poll_interval:  config.poll_interval(),
        }
    }

    /// One inspection at run offset `now`.
    ///
    /// Starvation is checked first, in agent order, so a starving run is
    /// reported as such even when the time budget ran out in the same poll.
    pub fn check(&self, now: Duration) -> Option<StopReason> {
        for cell in self.cells {
            let hungry_for = now.saturating_sub(cell.last_progress());
            if hungry_for > self.hunger_timeout {
                return Some(StopReason::Starvation { agent: cell.id(), hungry_for });
            }
        }
        (now > self.duration).then_some(StopReason::TimeExpired { elapsed: now })
    }

    /// Poll until a check fails or someone else stops the run.
    pub fn run(self) {
        loop {
            if let Some(reason) = self.check(self.clock.now()) {
                self.stop(reason);
                return;
            }
            if self.shutdown.wait_timeout(self.poll_interval) {
                return;
            }
        }
    }

    fn stop(&self, reason: StopReason) {
        let won = self.shutdown.trigger(reason.clone());
        if !won {
            // Someone else stopped the run first; their reason stands.
            return;
        }
        match reason {
            StopReason::Starvation { agent, hungry_for } => {
                tracing::warn!(
                    %agent,
                    hungry_secs = hungry_for.as_secs_f64(),
                    "philosopher starved, stopping the run",
                );
                let at = self.clock.now();
                let _ = self
                    .events
                    .send(ProgressEvent::new(at, agent, Action::Starved { hungry_for }));
            }
            other => tracing::info!(reason = %other, "run finished"),
        }
    }
}
