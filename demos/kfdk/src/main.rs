//! kfdk — headless ground-traffic run over a small general-aviation field.
//!
//! Usage: `kfdk [RUN_JSON]`
//!
//! Without arguments the built-in layout in [`airport`] is used with the
//! default `TrafficConfig`.  A run file may override any of:
//!
//! ```json
//! {
//!   "ticks": 7200,
//!   "output_dir": "output/kfdk",
//!   "nodes_csv": "kfdk_nodes.csv",
//!   "edges_csv": "kfdk_edges.csv",
//!   "arrival_share": 0.5,
//!   "emergency_share": 0.02,
//!   "traffic": { "stuck_timeout_ticks": 600, "max_active_aircraft": 6 }
//! }
//! ```

mod airport;


use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use gtc_core::{Tick, TrafficConfig};
use gtc_graph::{AirportGraph, DijkstraPlanner, load_graph_csv};
use gtc_output::{CsvWriter, OutputWriter, SimOutputObserver};
use gtc_sim::{AircraftSnapshot, SimBuilder, SimEvent, TickSummary, TrafficGenerator, TrafficObserver};

// ── Run file ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(default)]
struct RunFile {
    ticks:           u64,
    output_dir:      PathBuf,
    nodes_csv:       Option<PathBuf>,
    edges_csv:       Option<PathBuf>,
    arrival_share:   f64,
    emergency_share: f64,
    traffic:         TrafficConfig,
}

impl Default for RunFile {
    fn default() -> Self {
        Self {
            ticks:           3_600, // one simulated hour at 1 s/tick
            output_dir:      PathBuf::from("output/kfdk"),
            nodes_csv:       None,
            edges_csv:       None,
            arrival_share:   0.5,
            emergency_share: 0.02,
            traffic:         TrafficConfig { output_interval_ticks: 10, ..TrafficConfig::default() },
        }
    }
}

fn read_run_file(path: &Path) -> Result<RunFile> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

fn load_airport(run: &RunFile) -> Result<AirportGraph> {
    match (&run.nodes_csv, &run.edges_csv) {
        (Some(nodes), Some(edges)) => Ok(load_graph_csv(nodes, edges)?),
        (None, None) => Ok(airport::build()?),
        _ => anyhow::bail!("nodes_csv and edges_csv must be given together"),
    }
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the CSV observer and prints the notable events.
struct ConsoleObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
    peak_active:   usize,
    peak_holding:  usize,
}

impl<W: OutputWriter> ConsoleObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, peak_active: 0, peak_holding: 0 }
    }
}

impl<W: OutputWriter> TrafficObserver for ConsoleObserver<W> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_snapshot(&mut self, tick: Tick, snapshots: &[AircraftSnapshot]) {
        self.snapshot_rows += snapshots.len();
        self.inner.on_snapshot(tick, snapshots);
    }

    fn on_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Spawned { .. }
            | SimEvent::SpawnRejected { .. }
            | SimEvent::Replanned { .. }
            | SimEvent::StuckFault { .. }
            | SimEvent::Despawned { .. } => println!("{:>6}  {event}", event.tick().0),
            _ => {}
        }
        self.inner.on_event(event);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summary_rows += 1;
        self.peak_active = self.peak_active.max(summary.active);
        self.peak_holding = self.peak_holding.max(summary.holding);
        self.inner.on_tick_end(summary);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let run = match std::env::args_os().nth(1) {
        Some(path) => read_run_file(Path::new(&path))?,
        None => RunFile::default(),
    };
    run.traffic.validate()?;

    println!("=== kfdk — ground traffic control ===");
    println!(
        "Ticks: {}  |  Tick: {} s  |  Seed: {}",
        run.ticks, run.traffic.tick_duration_secs, run.traffic.random_seed
    );

    let graph = load_airport(&run)?;
    println!("Airport graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    println!();

    let mut traffic = TrafficGenerator::from_config(&run.traffic)
        .arrival_share(run.arrival_share)
        .emergency_share(run.emergency_share);
    let mut sim = SimBuilder::new(graph, run.traffic.clone(), DijkstraPlanner).build()?;

    std::fs::create_dir_all(&run.output_dir)?;
    let writer = CsvWriter::new(&run.output_dir)?;
    let mut obs = ConsoleObserver::new(SimOutputObserver::new(writer, &run.traffic));

    let t0 = Instant::now();
    sim.run_with_traffic(run.ticks, &mut traffic, &mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    let stats = sim.stats();
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  spawned        : {}", stats.spawned);
    println!("  arrived        : {}", stats.arrived);
    println!("  rejected       : {}", stats.rejected);
    println!("  replans        : {}", stats.replans);
    println!("  stuck faults   : {}", stats.stuck_faults);
    println!("  grants/denials : {}/{}", stats.grants, stats.denials);
    println!("  peak active    : {}  (holding {})", obs.peak_active, obs.peak_holding);
    println!("  still active   : {}", sim.active_count());
    println!();
    println!("  aircraft_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv     : {} rows", obs.summary_rows);
    println!("  written to {}", run.output_dir.display());

    Ok(())
}
