//! CSV output backend.
//!
//! Creates three files in the output directory:
//! - `aircraft_snapshots.csv`
//! - `tick_summaries.csv`
//! - `events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult, SnapshotRow, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 12] = [
    "tick",
    "elapsed_secs",
    "aircraft_id",
    "kind",
    "emergency",
    "state",
    "x",
    "y",
    "heading_deg",
    "velocity_mps",
    "edge_id",
    "progress",
];

pub const SUMMARY_HEADER: [&str; 11] = [
    "tick",
    "elapsed_secs",
    "active",
    "spawned",
    "despawned",
    "holding",
    "grants",
    "denials",
    "contested",
    "stuck_faults",
    "replans",
];

pub const EVENT_HEADER: [&str; 4] = ["tick", "aircraft_id", "kind", "detail"];

pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three files in `dir` (which must exist) and write their
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("aircraft_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(EVENT_HEADER)?;

        Ok(Self { snapshots, summaries, events, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                format!("{:.1}", row.elapsed_secs),
                row.aircraft_id.to_string(),
                row.kind.to_string(),
                (row.emergency as u8).to_string(),
                row.state.to_string(),
                format!("{:.2}", row.x),
                format!("{:.2}", row.y),
                format!("{:.1}", row.heading_deg),
                format!("{:.2}", row.velocity_mps),
                row.edge_id.to_string(),
                format!("{:.4}", row.progress),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.1}", row.elapsed_secs),
            row.active.to_string(),
            row.spawned.to_string(),
            row.despawned.to_string(),
            row.holding.to_string(),
            row.grants.to_string(),
            row.denials.to_string(),
            row.contested.to_string(),
            row.stuck_faults.to_string(),
            row.replans.to_string(),
        ])?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.aircraft_id.map(|id| id.to_string()).unwrap_or_default(),
                row.kind.to_string(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
