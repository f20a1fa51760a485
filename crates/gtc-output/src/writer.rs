//! The `OutputWriter` trait implemented by every backend.

use crate::{EventRow, OutputResult, SnapshotRow, TickSummaryRow};

/// Implemented by the CSV and SQLite writers.
///
/// Errors surface through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error]
/// when the writer is driven by the simulation.
pub trait OutputWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
