//! `StatsObserver<W>`: bridges `ProgressObserver` to an `OutputWriter`.

use dp_sim::{ProgressObserver, SimReport};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, write_report};

/// A [`ProgressObserver`] that persists the final statistics to any
/// [`OutputWriter`] backend when the run stops.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct StatsObserver<W: OutputWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> StatsObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of rows persisted so far.
    pub fn rows_written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer (e.g. to inspect output after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ProgressObserver for StatsObserver<W> {
    fn on_stop(&mut self, report: &SimReport) {
        let result = write_report(&mut self.writer, report);
        if result.is_ok() {
            self.written += report.records.len();
        }
        self.store_err(result);
    }
}
