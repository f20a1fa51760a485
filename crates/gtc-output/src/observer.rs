//! `SimOutputObserver<W>`: bridges `TrafficObserver` to an `OutputWriter`.

use log::warn;

use gtc_core::{Tick, TrafficConfig};
use gtc_sim::{AircraftSnapshot, SimEvent, TickSummary, TrafficObserver};

use crate::row::{EventRow, SnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`TrafficObserver`] that writes snapshots, tick summaries and events to
/// any [`OutputWriter`].
///
/// Observer methods cannot fail, so the first write error is kept and later
/// ones are logged and dropped.  Check [`take_error`][Self::take_error] after
/// the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    tick_duration_secs: f64,
    /// Events of the current tick, written together at tick end.
    pending:            Vec<EventRow>,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, config: &TrafficConfig) -> Self {
        Self {
            writer,
            tick_duration_secs: config.tick_duration_secs,
            pending:            Vec::new(),
            last_error:         None,
        }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            } else {
                warn!("dropping further output error: {e}");
            }
        }
    }
}

impl<W: OutputWriter> TrafficObserver for SimOutputObserver<W> {
    fn on_snapshot(&mut self, _tick: Tick, snapshots: &[AircraftSnapshot]) {
        if snapshots.is_empty() {
            return;
        }
        let rows: Vec<SnapshotRow> =
            snapshots.iter().map(|s| SnapshotRow::new(s, self.tick_duration_secs)).collect();
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);
    }

    fn on_event(&mut self, event: &SimEvent) {
        self.pending.push(EventRow::from(event));
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_events(&rows);
            self.store_err(result);
        }
        let row = TickSummaryRow::new(summary, self.tick_duration_secs);
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
