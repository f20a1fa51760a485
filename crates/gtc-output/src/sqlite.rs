//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the output directory with three tables:
//! `aircraft_snapshots`, `tick_summaries` and `events`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult, SnapshotRow, TickSummaryRow};

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS aircraft_snapshots (
                 tick         INTEGER NOT NULL,
                 elapsed_secs REAL    NOT NULL,
                 aircraft_id  INTEGER NOT NULL,
                 kind         TEXT    NOT NULL,
                 emergency    INTEGER NOT NULL,
                 state        TEXT    NOT NULL,
                 x            REAL    NOT NULL,
                 y            REAL    NOT NULL,
                 heading_deg  REAL    NOT NULL,
                 velocity_mps REAL    NOT NULL,
                 edge_id      INTEGER NOT NULL,
                 progress     REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick         INTEGER PRIMARY KEY,
                 elapsed_secs REAL    NOT NULL,
                 active       INTEGER NOT NULL,
                 spawned      INTEGER NOT NULL,
                 despawned    INTEGER NOT NULL,
                 holding      INTEGER NOT NULL,
                 grants       INTEGER NOT NULL,
                 denials      INTEGER NOT NULL,
                 contested    INTEGER NOT NULL,
                 stuck_faults INTEGER NOT NULL,
                 replans      INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS events (
                 tick        INTEGER NOT NULL,
                 aircraft_id INTEGER,
                 kind        TEXT    NOT NULL,
                 detail      TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO aircraft_snapshots \
                 (tick, elapsed_secs, aircraft_id, kind, emergency, state, x, y, heading_deg, velocity_mps, edge_id, progress) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.elapsed_secs,
                    row.aircraft_id,
                    row.kind,
                    row.emergency as i64,
                    row.state,
                    row.x,
                    row.y,
                    row.heading_deg,
                    row.velocity_mps,
                    row.edge_id,
                    row.progress,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, elapsed_secs, active, spawned, despawned, holding, grants, denials, contested, stuck_faults, replans) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                row.tick,
                row.elapsed_secs,
                row.active,
                row.spawned,
                row.despawned,
                row.holding,
                row.grants,
                row.denials,
                row.contested,
                row.stuck_faults,
                row.replans,
            ],
        )?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (tick, aircraft_id, kind, detail) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.aircraft_id, row.kind, row.detail])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
