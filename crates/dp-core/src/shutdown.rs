//! One-shot, cancellable shutdown signal shared by every thread of a run.
//!
//! # Mechanism
//!
//! The signal owns a zero-capacity channel on which nothing is ever sent.
//! Waiters block on the receiving end (directly, with a timeout, or inside a
//! `crossbeam::select!` next to a slot acquisition).  Triggering drops the
//! only sender, which disconnects the channel and wakes every waiter at once.
//! A blocked wait therefore observes shutdown immediately instead of on its
//! next poll.
//!
//! The first trigger wins: its [`StopReason`] and timestamp are recorded and
//! every later trigger is a no-op that returns `false`.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::AgentId;

// ── StopReason ────────────────────────────────────────────────────────────────

/// Why a run stopped.
#[derive(Clone, Debug, PartialEq)]
pub enum StopReason {
    /// The configured run duration elapsed.  Normal termination.
    TimeExpired { elapsed: Duration },

    /// `agent` went longer than the hunger timeout without starting a meal.
    Starvation { agent: AgentId, hungry_for: Duration },

    /// Stopped from outside the engine through a clone of the signal.
    Requested,

    /// A worker thread panicked or could not be spawned.
    Aborted { thread: String },
}

impl StopReason {
    /// `true` for starvation and aborts; `false` for the two orderly stops.
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::Starvation { .. } | StopReason::Aborted { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TimeExpired { elapsed } => {
                write!(f, "time expired after {:.2} s", elapsed.as_secs_f64())
            }
            StopReason::Starvation { agent, hungry_for } => write!(
                f,
                "starvation: {agent} went {:.2} s without eating",
                hungry_for.as_secs_f64()
            ),
            StopReason::Requested => f.write_str("stop requested"),
            StopReason::Aborted { thread } => write!(f, "aborted: thread {thread} failed"),
        }
    }
}

// ── ShutdownSignal ────────────────────────────────────────────────────────────

struct Inner {
    stop:      OnceLock<(StopReason, Instant)>,
    trigger:   Mutex<Option<Sender<()>>>,
    cancelled: Receiver<()>,
}

/// Cloneable handle to a run's one-shot shutdown signal.
///
/// All clones observe the same state.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, rx) = channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                stop:      OnceLock::new(),
                trigger:   Mutex::new(Some(tx)),
                cancelled: rx,
            }),
        }
    }

    /// Stop the run.  Returns `true` if this call was the one that stopped
    /// it, `false` if it was already stopped (the earlier reason is kept).
    pub fn trigger(&self, reason: StopReason) -> bool {
        if self.inner.stop.set((reason, Instant::now())).is_err() {
            return false;
        }
        // Dropping the sender disconnects the channel and wakes all waiters.
        drop(self.inner.trigger.lock().take());
        if let Some(reason) = self.reason() {
            tracing::debug!(%reason, "shutdown triggered");
        }
        true
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.inner.stop.get().is_some()
    }

    /// The reason recorded by the winning trigger.
    pub fn reason(&self) -> Option<&StopReason> {
        self.inner.stop.get().map(|(reason, _)| reason)
    }

    /// When the winning trigger happened.
    pub fn stopped_at(&self) -> Option<Instant> {
        self.inner.stop.get().map(|&(_, at)| at)
    }

    /// Receiver that becomes disconnected on shutdown.  Use it as a `recv`
    /// arm in `crossbeam::select!` to make a blocking operation cancellable.
    #[inline]
    pub fn cancelled(&self) -> &Receiver<()> {
        &self.inner.cancelled
    }

    /// Sleep for `timeout` or until shutdown, whichever comes first.
    /// Returns `true` if shutdown was observed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_triggered() {
            return true;
        }
        !matches!(
            self.inner.cancelled.recv_timeout(timeout),
            Err(RecvTimeoutError::Timeout)
        )
    }

    /// Block until shutdown.
    pub fn wait(&self) {
        // Nothing is ever sent, so this only returns on disconnection.
        let _ = self.inner.cancelled.recv();
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownSignal")
            .field("reason", &self.reason())
            .finish()
    }
}
