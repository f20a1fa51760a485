//! Fluent builder for constructing a [`Simulation`].

use gtc_agent::MotionLimits;
use gtc_core::{SimClock, Tick, TrafficConfig};
use gtc_graph::{AirportGraph, PathPlanner};
use gtc_occupancy::{ConflictResolver, OccupancyManager};

use crate::feed::{SimStats, TickSummary};
use crate::sim::{Simulation, SimulationState};
use crate::SimResult;

/// Fluent builder for [`Simulation<P>`].
///
/// # Required inputs
///
/// - [`AirportGraph`], already loaded and validated
/// - [`TrafficConfig`], checked by [`build`](Self::build)
/// - `P: PathPlanner`, e.g. [`gtc_graph::DijkstraPlanner`]
///
/// # Optional inputs
///
/// | Method            | Default   |
/// |-------------------|-----------|
/// | `.start_tick(t)`  | `Tick(0)` |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(graph, TrafficConfig::default(), DijkstraPlanner).build()?;
/// sim.spawn_departure(gate, runway, 7)?;
/// sim.run_until_idle(1_000, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PathPlanner> {
    graph:      AirportGraph,
    config:     TrafficConfig,
    planner:    P,
    start_tick: Tick,
}

impl<P: PathPlanner> SimBuilder<P> {
    pub fn new(graph: AirportGraph, config: TrafficConfig, planner: P) -> Self {
        Self { graph, config, planner, start_tick: Tick::ZERO }
    }

    /// Start the clock at `tick` instead of zero.
    pub fn start_tick(mut self, tick: Tick) -> Self {
        self.start_tick = tick;
        self
    }

    /// Validate the configuration and return a ready-to-run [`Simulation`]
    /// with no aircraft.
    pub fn build(self) -> SimResult<Simulation<P>> {
        self.config.validate()?;

        let mut clock = SimClock::new(self.config.tick_duration_secs);
        clock.current_tick = self.start_tick;

        let occupancy = OccupancyManager::new(
            &self.graph,
            self.config.min_taxi_separation_m,
            self.config.tick_duration_secs,
        );
        let limits = MotionLimits::from_config(&self.config);

        Ok(Simulation {
            clock,
            limits,
            state:              SimulationState { occupancy, aircraft: Default::default() },
            graph:              self.graph,
            planner:            self.planner,
            resolver:           ConflictResolver::new(),
            next_id:            0,
            events:             Vec::new(),
            spawned_since_step: 0,
            stats:              SimStats::default(),
            last_summary:       TickSummary::default(),
            config:             self.config,
        })
    }
}
