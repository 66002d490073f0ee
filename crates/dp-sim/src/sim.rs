//! The `Sim` struct and its run loop.

use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};

use crossbeam::channel;
use dp_agent::{AgentCell, Philosopher};
use dp_core::{ProgressEvent, RunClock, ShutdownSignal, SimConfig, StopReason};
use dp_monitor::LivenessMonitor;
use dp_ring::ResourceRing;

use crate::{ProgressObserver, SimError, SimReport, SimResult, collect_stats};

/// A configured, not-yet-started run.
///
/// Create via [`SimBuilder`][crate::SimBuilder]; consume with [`run`][Self::run].
pub struct Sim {
    pub config:          SimConfig,
    pub(crate) ring:     Arc<ResourceRing>,
    pub(crate) shutdown: ShutdownSignal,
    pub(crate) cells:    Vec<AgentCell>,
}

impl Sim {
    /// The ring the philosophers will contend on.
    pub fn ring(&self) -> &Arc<ResourceRing> {
        &self.ring
    }

    /// A clone of the run's shutdown signal.  Triggering it stops the run
    /// with whatever reason is passed, if nothing stopped it first.
    pub fn shutdown_handle(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Run until the monitor (or a holder of the shutdown signal) stops it.
    ///
    /// Blocks the calling thread.  Progress events are delivered to
    /// `observer` from a reporter thread; the final report is passed to
    /// `observer.on_stop` and returned.
    ///
    /// A panicking worker stops the run as [`StopReason::Aborted`]; the
    /// report is still produced, with the thread names in
    /// [`SimReport::panicked`].
    pub fn run<O: ProgressObserver + Send>(self, observer: &mut O) -> SimResult<SimReport> {
        let Sim { config, ring, shutdown, cells } = self;
        let clock = RunClock::start();

        tracing::info!(
            agents = config.agent_count,
            duration_secs = config.duration_secs,
            hunger_timeout_secs = config.hunger_timeout_secs,
            "starting run",
        );

        let panicked = thread::scope(|s| -> SimResult<Vec<String>> {
            let (events_tx, events_rx) = channel::unbounded::<ProgressEvent>();

            let reporter = {
                let obs = &mut *observer;
                spawn_named(s, &shutdown, "reporter".to_owned(), move || {
                    for event in events_rx.iter() {
                        obs.on_event(&event);
                    }
                })?
            };

            let mut philosophers = Vec::with_capacity(cells.len());
            for cell in &cells {
                let p = Philosopher::new(cell, &ring, &config, clock, shutdown.clone(), events_tx.clone());
                let name = format!("philosopher-{}", p.id().0);
                philosophers.push((name.clone(), spawn_named(s, &shutdown, name, move || p.run())?));
            }

            let monitor = LivenessMonitor::new(&cells, &config, clock, shutdown.clone(), events_tx.clone());
            let monitor = spawn_named(s, &shutdown, "monitor".to_owned(), move || monitor.run())?;

            // The reporter finishes once every philosopher and the monitor
            // have dropped their senders.
            drop(events_tx);
            shutdown.wait();

            let mut panicked = Vec::new();
            for (name, handle) in philosophers {
                if handle.join().is_err() {
                    panicked.push(name);
                }
            }
            if monitor.join().is_err() {
                panicked.push("monitor".to_owned());
            }
            if reporter.join().is_err() {
                panicked.push("reporter".to_owned());
            }
            Ok(panicked)
        })?;

        if !panicked.is_empty() {
            tracing::error!(threads = %panicked.join(", "), "run aborted by panicking thread(s)");
        }

        let reason = shutdown.reason().cloned().unwrap_or(StopReason::Requested);
        let stopped_after = shutdown
            .stopped_at()
            .map(|at| clock.since_start(at))
            .unwrap_or_else(|| clock.now());

        let report = SimReport {
            reason,
            stopped_after,
            records: collect_stats(cells),
            slots: ring.stats(),
            panicked,
        };
        tracing::info!(
            reason = %report.reason,
            meals = report.total_meals(),
            stopped_after_secs = report.stopped_after.as_secs_f64(),
            "run complete",
        );
        observer.on_stop(&report);
        Ok(report)
    }
}

/// Spawn a named scoped thread that stops the run if it panics.
///
/// If spawning itself fails the run is stopped too, so threads spawned
/// earlier exit and the enclosing scope can finish.
fn spawn_named<'scope, 'env, F>(
    s:        &'scope Scope<'scope, 'env>,
    shutdown: &ShutdownSignal,
    name:     String,
    f:        F,
) -> SimResult<ScopedJoinHandle<'scope, ()>>
where
    F: FnOnce() + Send + 'scope,
{
    let guard = AbortOnPanic { shutdown: shutdown.clone(), thread: name.clone() };
    thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(s, move || {
            let _guard = guard;
            f();
        })
        .map_err(|source| {
            shutdown.trigger(StopReason::Aborted { thread: name.clone() });
            SimError::Spawn { thread: name, source }
        })
}

/// Stops the run when the owning thread unwinds.
struct AbortOnPanic {
    shutdown: ShutdownSignal,
    thread:   String,
}

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            tracing::error!(thread = %self.thread, "worker thread panicked");
            self.shutdown.trigger(StopReason::Aborted { thread: std::mem::take(&mut self.thread) });
        }
    }
}
