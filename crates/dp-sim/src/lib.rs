//! `dp-sim`: the run controller for the rust_dp engine.
//!
//! # Thread layout
//!
//! ```text
//! controller ──spawn──► philosopher-0 … philosopher-{N-1}   (one per agent)
//!            ──spawn──► monitor                              (LivenessMonitor)
//!            ──spawn──► reporter ◄── ProgressEvent channel ── philosophers, monitor
//!            wait for shutdown, join everyone, collect statistics
//! ```
//!
//! All threads are scoped, so they borrow the ring and the agent cells
//! directly.  Statistics are read only after every philosopher has been
//! joined, from cells the controller owns again.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dp_core::SimConfig;
//! use dp_sim::{LogObserver, SimBuilder};
//!
//! let sim = SimBuilder::new(SimConfig::default()).build()?;
//! let report = sim.run(&mut LogObserver)?;
//! for record in &report.records {
//!     println!("{},{:.2},{}", record.id.0, record.max_hungry_secs(), record.eat_count);
//! }
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{LogObserver, NoopObserver, ProgressObserver};
pub use report::{AgentRecord, SimReport, collect_stats};
pub use sim::Sim;
