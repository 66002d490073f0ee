//! `dp-core`: foundational types for the `rust_dp` dining-philosophers engine.
//!
//! This crate is a dependency of every other `dp-*` crate.  It has no `dp-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`ids`]        | `AgentId`, `SlotId`                                       |
//! | [`time`]       | `RunClock`, `TimeRange`                                   |
//! | [`config`]     | `SimConfig` (defaults, TOML loading, validation)          |
//! | [`rng`]        | `AgentRng` (per-agent delay sampling)                     |
//! | [`shutdown`]   | `ShutdownSignal`, `StopReason`                            |
//! | [`event`]      | `Phase`, `Action`, `ProgressEvent`, `EventSender`         |
//! | [`error`]      | `DpError`, `DpResult`                                     |

pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod rng;
pub mod shutdown;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{DpError, DpResult};
pub use event::{Action, EventReceiver, EventSender, Phase, ProgressEvent, Side};
pub use ids::{AgentId, SlotId};
pub use rng::AgentRng;
pub use shutdown::{ShutdownSignal, StopReason};
pub use time::{RunClock, TimeRange};
