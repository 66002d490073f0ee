//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, StatsRow};

/// A sink for final run statistics.
pub trait OutputWriter {
    /// Write one line per row, in the order given.
    fn write_stats(&mut self, rows: &[StatsRow]) -> OutputResult<()>;

    /// Flush all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
