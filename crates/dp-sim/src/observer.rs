//! Progress observer trait for reporting.

use dp_core::ProgressEvent;

use crate::SimReport;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// `on_event` runs on the dedicated reporter thread, fed by an unbounded
/// channel, so a slow observer delays reporting but never a philosopher.
/// `on_stop` runs on the caller's thread once the run is over.
///
/// Both methods default to no-ops.
///
/// # Example: meal counter
///
/// ```rust,ignore
/// struct Meals(u64);
///
/// impl ProgressObserver for Meals {
///     fn on_event(&mut self, event: &ProgressEvent) {
///         if event.action == Action::Eat {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait ProgressObserver {
    fn on_event(&mut self, _event: &ProgressEvent) {}

    fn on_stop(&mut self, _report: &SimReport) {}
}

/// A [`ProgressObserver`] that does nothing.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Forwards every event to `tracing` at `info` level.
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_event(&mut self, event: &ProgressEvent) {
        tracing::info!(
            agent = event.agent.0,
            action = event.action.label(),
            at_ms = event.at.as_millis() as u64,
            "{}: {}",
            event.agent,
            event.detail,
        );
    }

    fn on_stop(&mut self, report: &SimReport) {
        if report.reason.is_failure() {
            tracing::warn!(reason = %report.reason, meals = report.total_meals(), "run stopped");
        } else {
            tracing::info!(reason = %report.reason, meals = report.total_meals(), "run stopped");
        }
    }
}
