//! Seeded random traffic: departures from gates and arrivals on runways at
//! random intervals.

use log::trace;

use gtc_agent::exit_candidates;
use gtc_core::{AircraftId, FlightKind, SimRng, Tick, TrafficConfig};
use gtc_graph::{NodeKind, PathPlanner};

use crate::sim::Simulation;
use crate::spawn::SpawnRequest;
use crate::SpawnError;

/// Spawns aircraft at random intervals drawn from a seeded stream, so a
/// given seed always produces the same traffic.
///
/// Refused spawns (busy gate, runway in use, no route) are recorded as
/// `SpawnRejected` events and never stop the run.
#[derive(Clone, Debug)]
pub struct TrafficGenerator {
    rng:             SimRng,
    min_interval:    u64,
    max_interval:    u64,
    arrival_share:   f64,
    emergency_share: f64,
    next_spawn:      Tick,
}

impl TrafficGenerator {
    pub const DEFAULT_MIN_INTERVAL: u64 = 20;
    pub const DEFAULT_MAX_INTERVAL: u64 = 40;

    pub fn new(seed: u64) -> Self {
        Self {
            rng:             SimRng::new(seed),
            min_interval:    Self::DEFAULT_MIN_INTERVAL,
            max_interval:    Self::DEFAULT_MAX_INTERVAL,
            arrival_share:   0.5,
            emergency_share: 0.0,
            next_spawn:      Tick::ZERO,
        }
    }

    /// Seeded from a child of the configured master seed.
    pub fn from_config(config: &TrafficConfig) -> Self {
        let mut master = SimRng::new(config.random_seed);
        Self { rng: master.child(1), ..Self::new(config.random_seed) }
    }

    /// Ticks between spawn attempts, inclusive.  Zero is treated as one.
    pub fn interval(mut self, min_ticks: u64, max_ticks: u64) -> Self {
        let lo = min_ticks.max(1);
        self.min_interval = lo;
        self.max_interval = max_ticks.max(lo);
        self
    }

    /// Probability that a spawn is an arrival.
    pub fn arrival_share(mut self, p: f64) -> Self {
        self.arrival_share = p.clamp(0.0, 1.0);
        self
    }

    /// Probability that a spawn declares an emergency.
    pub fn emergency_share(mut self, p: f64) -> Self {
        self.emergency_share = p.clamp(0.0, 1.0);
        self
    }

    /// Earliest tick of the next spawn attempt.
    pub fn next_spawn(&self) -> Tick {
        self.next_spawn
    }

    /// Spawn into `sim` if an attempt is due at its current tick.  Returns
    /// `None` when nothing was attempted.  At capacity the attempt is put
    /// off to the next tick.
    pub fn spawn_due<P: PathPlanner>(&mut self, sim: &mut Simulation<P>) -> Option<Result<AircraftId, SpawnError>> {
        let now = sim.now();
        if now < self.next_spawn {
            return None;
        }
        if sim.config.max_active_aircraft.is_some_and(|cap| sim.active_count() >= cap) {
            self.next_spawn = now.offset(1);
            return None;
        }
        self.next_spawn = now.offset(self.rng.gen_range(self.min_interval..=self.max_interval));

        let kind = if self.rng.gen_bool(self.arrival_share) { FlightKind::Arrival } else { FlightKind::Departure };
        let emergency = self.rng.gen_bool(self.emergency_share);
        let seed: u64 = self.rng.random();

        let graph = sim.graph();
        let thresholds = graph.nodes_of_kind(NodeKind::RunwayThreshold);
        let request = match kind {
            FlightKind::Arrival => {
                let landable: Vec<_> = thresholds
                    .iter()
                    .copied()
                    .filter(|&t| !exit_candidates(graph, &graph.runway_rollout(t)).is_empty())
                    .collect();
                let pool = if landable.is_empty() { &thresholds } else { &landable };
                SpawnRequest::Arrival { runway: *self.rng.choose(pool)? }
            }
            FlightKind::Departure => {
                let gates = graph.nodes_of_kind(NodeKind::Gate);
                let gate = *self.rng.choose(&gates)?;
                SpawnRequest::Departure { gate, runway: *self.rng.choose(&thresholds)? }
            }
        };

        trace!("{now}: generator requests {request:?}");
        let result = sim.spawn(request, emergency, seed);
        if let Err(e) = &result {
            sim.report_rejection(kind, request.node(), e);
        }
        Some(result)
    }
}
