//! `dp-agent`: one philosopher per thread.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`cell`]          | `AgentCell` (atomics), `CellSnapshot`                     |
//! | [`order`]         | `AcquireOrder`: which chopstick is taken first           |
//! | [`philosopher`]   | `Philosopher`: the Thinking → Hungry → Eating loop       |
//!
//! # Ownership
//!
//! Each `AgentCell` is written only by the thread running its `Philosopher`.
//! The liveness monitor reads it concurrently through atomic loads; the
//! statistics pass reads it after the thread has been joined, by taking the
//! cells back by value.

pub mod cell;
pub mod order;
pub mod philosopher;


pub use cell::{AgentCell, CellSnapshot};
pub use order::AcquireOrder;
pub use philosopher::Philosopher;
