//! `dp-ring`: the shared ring of chopsticks.
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ring`]   | `ResourceRing`, `SlotGuard`, `SlotStats`                 |
//! | [`error`]  | `RingError`, `RingResult<T>`                             |
//!
//! Each slot is held by at most one philosopher at a time.  Acquisition blocks
//! until the slot is free *or* the run's [`ShutdownSignal`] fires, so a
//! philosopher stuck waiting on a neighbour never outlives the run.
//! Releases happen when the returned [`SlotGuard`] is dropped.
//!
//! [`ShutdownSignal`]: dp_core::ShutdownSignal

pub mod error;
pub mod ring;


pub use error::{RingError, RingResult};
pub use ring::{ResourceRing, SlotGuard, SlotStats};
