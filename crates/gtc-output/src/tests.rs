//! Unit tests for gtc-output.

use tempfile::TempDir;

use crate::row::{EventRow, SnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn snap_row(aircraft_id: u32, tick: u64) -> SnapshotRow {
    SnapshotRow {
        tick,
        elapsed_secs: tick as f64,
        aircraft_id,
        kind: "departure",
        emergency: false,
        state: "taxiing",
        x: 12.5,
        y: -40.0,
        heading_deg: 90.0,
        velocity_mps: 10.0,
        edge_id: 3,
        progress: 0.25,
    }
}

fn summary_row(tick: u64) -> TickSummaryRow {
    TickSummaryRow {
        tick,
        elapsed_secs: tick as f64 * 2.0,
        active: 4,
        spawned: 1,
        despawned: 0,
        holding: 2,
        grants: 3,
        denials: 2,
        contested: 1,
        stuck_faults: 0,
        replans: 0,
    }
}

fn event_row(tick: u64, aircraft_id: Option<u32>) -> EventRow {
    EventRow { tick, aircraft_id, kind: "holding-short", detail: "AircraftId(1) holding short".into() }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::{CsvWriter, EVENT_HEADER, SNAPSHOT_HEADER, SUMMARY_HEADER};

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(dir.path().join("aircraft_snapshots.csv")), SNAPSHOT_HEADER);
        assert_eq!(headers(dir.path().join("tick_summaries.csv")), SUMMARY_HEADER);
        assert_eq!(headers(dir.path().join("events.csv")), EVENT_HEADER);
    }

    #[test]
    fn snapshot_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("aircraft_snapshots.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");
        assert_eq!(&rows[1][2], "1");
        assert_eq!(&rows[0][3], "departure");
        assert_eq!(&rows[0][4], "0");
        assert_eq!(&rows[0][5], "taxiing");
        assert_eq!(&rows[0][6], "12.50");
        assert_eq!(&rows[0][7], "-40.00");
        assert_eq!(&rows[0][11], "0.2500");
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "6.0");
        assert_eq!(&rows[0][5], "2");
    }

    #[test]
    fn event_without_aircraft_leaves_the_column_empty() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_events(&[event_row(1, Some(7)), event_row(2, None)]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("events.csv"));
        assert_eq!(&rows[0][1], "7");
        assert_eq!(&rows[1][1], "");
        assert_eq!(&rows[1][2], "holding-short");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("nope"));
        assert!(result.is_err());
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use gtc_core::{NodeId, TrafficConfig};
    use gtc_graph::{AirportGraph, DijkstraPlanner, EdgeSpec, GraphDescription, NodeKind};
    use gtc_sim::SimBuilder;

    use super::*;
    use crate::{CsvWriter, SimOutputObserver};

    fn tee() -> AirportGraph {
        let mut d = GraphDescription::new();
        d.node("A", NodeKind::Gate, 0.0, 0.0)
            .node("B", NodeKind::Intersection, 0.0, 100.0)
            .node("C", NodeKind::RunwayThreshold, 0.0, 300.0)
            .edge(EdgeSpec::between("A", "B", 10.0))
            .edge(EdgeSpec::between("B", "C", 10.0).runway());
        AirportGraph::load(&d).unwrap()
    }

    #[test]
    fn full_run_to_csv() {
        let config = TrafficConfig { output_interval_ticks: 10, ..TrafficConfig::default() };
        let mut sim = SimBuilder::new(tee(), config.clone(), DijkstraPlanner).build().unwrap();
        sim.spawn_departure(NodeId(0), NodeId(2), 1).unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &config);
        let ran = sim.run_until_idle(100, &mut obs).unwrap();
        assert_eq!(ran, 30);
        assert!(obs.take_error().is_none());

        let read = |name: &str| -> Vec<csv::StringRecord> {
            let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
            rdr.records().map(|r| r.unwrap()).collect()
        };

        // Snapshots at ticks 0, 10 and 20.
        let snaps = read("aircraft_snapshots.csv");
        let ticks: Vec<&str> = snaps.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(ticks, ["0", "10", "20"]);

        assert_eq!(read("tick_summaries.csv").len(), 30);

        let events = read("events.csv");
        let kinds: Vec<&str> = events.iter().map(|r| r.get(2).unwrap()).collect();
        assert_eq!(kinds.first(), Some(&"spawned"));
        assert_eq!(kinds.last(), Some(&"despawned"));
        assert!(kinds.contains(&"clearance"));
        assert_eq!(events.last().map(|r| r.get(0).unwrap().to_owned()), Some("29".to_owned()));
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::sqlite::SqliteWriter;

    #[test]
    fn db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 1), snap_row(1, 1), snap_row(2, 1)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM aircraft_snapshots", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn tick_summary_stored() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(7)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (holding, grants): (i64, i64) = conn
            .query_row("SELECT holding, grants FROM tick_summaries WHERE tick = 7", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!((holding, grants), (2, 3));
    }

    #[test]
    fn event_without_aircraft_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_events(&[event_row(4, None)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let id: Option<i64> = conn.query_row("SELECT aircraft_id FROM events", [], |r| r.get(0)).unwrap();
        assert_eq!(id, None);
    }
}
