//! Philosopher phases and the progress events emitted on every transition.
//!
//! Events travel over an unbounded `crossbeam` channel to a single reporter
//! thread, so emitting one never blocks the philosopher.

use std::fmt;
use std::time::Duration;

use crate::{AgentId, SlotId};

/// Lifecycle phase of a philosopher.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum Phase {
    #[default]
    Thinking = 0,
    Hungry   = 1,
    Eating   = 2,
}

impl Phase {
    /// Inverse of `phase as u8`, for phases stored in an `AtomicU8`.
    pub fn from_u8(raw: u8) -> Option<Phase> {
        match raw {
            0 => Some(Phase::Thinking),
            1 => Some(Phase::Hungry),
            2 => Some(Phase::Eating),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Thinking => "thinking",
            Phase::Hungry   => "hungry",
            Phase::Eating   => "eating",
        })
    }
}

/// Which of a philosopher's two slots an action refers to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    /// Slot `id`.
    Left,
    /// Slot `(id + 1) mod N`.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left  => "left",
            Side::Right => "right",
        })
    }
}

/// What happened.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Think,
    Hungry,
    PickUp { slot: SlotId, side: Side },
    Eat,
    PutDown { slot: SlotId, side: Side },
    /// Emitted by the liveness monitor, not by the philosopher itself.
    Starved { hungry_for: Duration },
}

impl Action {
    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Think          => "think",
            Action::Hungry         => "hungry",
            Action::PickUp { .. }  => "pick_up",
            Action::Eat            => "eat",
            Action::PutDown { .. } => "put_down",
            Action::Starved { .. } => "starved",
        }
    }

    /// Human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Action::Think => "is thinking".to_owned(),
            Action::Hungry => "is hungry, reaching for chopsticks".to_owned(),
            Action::PickUp { slot, side } => format!("picks up {side} chopstick ({slot})"),
            Action::Eat => "is eating".to_owned(),
            Action::PutDown { slot, side } => format!("puts down {side} chopstick ({slot})"),
            Action::Starved { hungry_for } => format!(
                "has been hungry too long ({:.2} s)",
                hungry_for.as_secs_f64()
            ),
        }
    }
}

/// One progress report.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    /// Offset from the run start (see [`RunClock`][crate::RunClock]).
    pub at:     Duration,
    pub agent:  AgentId,
    pub action: Action,
    pub detail: String,
}

impl ProgressEvent {
    pub fn new(at: Duration, agent: AgentId, action: Action) -> Self {
        let detail = action.describe();
        Self { at, agent, action, detail }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>9.3} s] {}: {}", self.at.as_secs_f64(), self.agent, self.detail)
    }
}

pub type EventSender = crossbeam::channel::Sender<ProgressEvent>;
pub type EventReceiver = crossbeam::channel::Receiver<ProgressEvent>;
