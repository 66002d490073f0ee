//! CSV output backend.
//!
//! One file, header `ID,MaxHungrySeconds,EatCount`, one line per
//! philosopher with the wait formatted to two decimals.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, StatsRow};

/// Column names, in write order.
pub const STATS_HEADER: [&str; 3] = ["ID", "MaxHungrySeconds", "EatCount"];

/// Writes final statistics as CSV to any [`io::Write`] sink.
pub struct CsvWriter<W: io::Write = File> {
    inner:    Writer<W>,
    finished: bool,
}

impl CsvWriter<File> {
    /// Create (or truncate) the file at `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        tracing::debug!(path = %path.display(), "opening statistics file");
        Self::from_writer(File::create(path)?)
    }
}

impl<W: io::Write> CsvWriter<W> {
    /// Wrap `sink` and write the header row.
    pub fn from_writer(sink: W) -> OutputResult<Self> {
        let mut inner = Writer::from_writer(sink);
        inner.write_record(STATS_HEADER)?;
        Ok(Self { inner, finished: false })
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> OutputResult<W> {
        self.inner.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: io::Write> OutputWriter for CsvWriter<W> {
    fn write_stats(&mut self, rows: &[StatsRow]) -> OutputResult<()> {
        for row in rows {
            self.inner.write_record(&[
                row.id.to_string(),
                format!("{:.2}", row.max_hungry_secs),
                row.eat_count.to_string(),
            ])?;
        }
        tracing::debug!(rows = rows.len(), "statistics rows written");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.inner.flush()?;
        Ok(())
    }
}
