//! `dp-monitor`: the liveness watchdog.
//!
//! A single [`LivenessMonitor`] polls every philosopher's last-progress
//! timestamp and the total run time.  It only reads: it never touches a
//! chopstick and never writes an [`AgentCell`][dp_agent::AgentCell].  Its
//! one side effect is triggering the shared shutdown signal.

pub mod monitor;


pub use monitor::LivenessMonitor;
