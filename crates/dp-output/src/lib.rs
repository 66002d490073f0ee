//! `dp-output`: persistence of final run statistics.
//!
//! | Backend     | Output                                           |
//! |-------------|--------------------------------------------------|
//! | [`CsvWriter`] | `ID,MaxHungrySeconds,EatCount` + one line per philosopher |
//!
//! Backends implement [`OutputWriter`].  Use [`write_report`] directly
//! with a finished [`SimReport`], or hand a [`StatsObserver`] to
//! `Sim::run` to persist on stop.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dp_output::{CsvWriter, write_report};
//!
//! let report = sim.run(&mut LogObserver)?;
//! let mut writer = CsvWriter::create(Path::new("philosophers_stats.csv"))?;
//! write_report(&mut writer, &report)?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


use dp_sim::SimReport;

pub use csv::{CsvWriter, STATS_HEADER};
pub use error::{OutputError, OutputResult};
pub use observer::StatsObserver;
pub use row::{StatsRow, stats_rows};
pub use writer::OutputWriter;

/// Write every record of `report` and finish the writer.
///
/// Statistics are written whatever stopped the run.
pub fn write_report<W: OutputWriter + ?Sized>(writer: &mut W, report: &SimReport) -> OutputResult<()> {
    writer.write_stats(&stats_rows(&report.records))?;
    writer.finish()
}
