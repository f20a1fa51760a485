//! Spawn API: admitting departures at gates and arrivals at runway
//! thresholds.
//!
//! A spawn either succeeds completely (aircraft created, spawn reservations
//! committed, `Spawned` and first `Clearance` events recorded) or fails with
//! a [`SpawnError`] and changes nothing.

use log::{debug, info};
use rand::seq::SliceRandom;

use gtc_agent::{Aircraft, AircraftInit, Itinerary, select_exit, stopping_distance};
use gtc_core::{AircraftId, AircraftRng, FlightKind, NodeId, TimeWindow};
use gtc_graph::{NodeKind, PathPlanner};
use gtc_occupancy::{Claim, Decision, Element};

use crate::feed::SimEvent;
use crate::sim::{Simulation, issue_clearance};
use crate::SpawnError;

/// What to spawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnRequest {
    /// Push back from `gate` and taxi to `runway` (a threshold).
    Departure { gate: NodeId, runway: NodeId },
    /// Touch down at `runway` (a threshold), roll out and taxi to a gate.
    Arrival { runway: NodeId },
}

impl SpawnRequest {
    pub fn kind(&self) -> FlightKind {
        match self {
            SpawnRequest::Departure { .. } => FlightKind::Departure,
            SpawnRequest::Arrival { .. } => FlightKind::Arrival,
        }
    }

    /// The node the aircraft appears at.
    pub fn node(&self) -> NodeId {
        match *self {
            SpawnRequest::Departure { gate, .. } => gate,
            SpawnRequest::Arrival { runway } => runway,
        }
    }
}

impl<P: PathPlanner> Simulation<P> {
    pub fn spawn_departure(&mut self, gate: NodeId, runway: NodeId, seed: u64) -> Result<AircraftId, SpawnError> {
        self.spawn(SpawnRequest::Departure { gate, runway }, false, seed)
    }

    pub fn spawn_emergency_departure(
        &mut self,
        gate:   NodeId,
        runway: NodeId,
        seed:   u64,
    ) -> Result<AircraftId, SpawnError> {
        self.spawn(SpawnRequest::Departure { gate, runway }, true, seed)
    }

    pub fn spawn_arrival(&mut self, runway: NodeId, seed: u64) -> Result<AircraftId, SpawnError> {
        self.spawn(SpawnRequest::Arrival { runway }, false, seed)
    }

    pub fn spawn_emergency_arrival(&mut self, runway: NodeId, seed: u64) -> Result<AircraftId, SpawnError> {
        self.spawn(SpawnRequest::Arrival { runway }, true, seed)
    }

    /// Admit one aircraft at the current tick.  `seed` selects the
    /// aircraft's private random stream.
    pub fn spawn(&mut self, request: SpawnRequest, emergency: bool, seed: u64) -> Result<AircraftId, SpawnError> {
        let active = self.state.active_count();
        if let Some(cap) = self.config.max_active_aircraft.filter(|&cap| active >= cap) {
            return Err(SpawnError::CapacityReached(cap));
        }
        let node = request.node();
        if !self.graph.contains_node(node) {
            return Err(SpawnError::UnknownNode(node));
        }

        let id = AircraftId(self.next_id);
        let init = AircraftInit {
            id,
            kind: request.kind(),
            emergency,
            spawn_tick: self.clock.current_tick,
            seed,
            global_seed: self.config.random_seed,
            initial_speed: 0.0,
        };
        let aircraft = match request {
            SpawnRequest::Departure { gate, runway } => self.admit_departure(init, gate, runway)?,
            SpawnRequest::Arrival { runway } => self.admit_arrival(init, runway)?,
        };
        Ok(self.commit_spawn(aircraft, node))
    }

    /// Record a refused spawn in the event feed.
    pub fn report_rejection(&mut self, kind: FlightKind, node: NodeId, error: &SpawnError) {
        let now = self.clock.current_tick;
        info!("{now}: {kind} spawn at {node} rejected: {error}");
        self.stats.rejected += 1;
        self.events.push(SimEvent::SpawnRejected { tick: now, kind, node, reason: error.to_string() });
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn admit_departure(&mut self, init: AircraftInit, gate: NodeId, runway: NodeId) -> Result<Aircraft, SpawnError> {
        let graph = &self.graph;
        if graph.node(gate).kind != NodeKind::Gate {
            return Err(SpawnError::NotASpawnNode(gate));
        }
        if graph.get_node(runway).is_none_or(|n| n.kind != NodeKind::RunwayThreshold) {
            return Err(SpawnError::NotADestination(runway));
        }
        let now = self.clock.current_tick;
        if let Some(holder) = self.state.occupancy.query(Element::Node(gate), now) {
            return Err(SpawnError::NodeBusy { node: gate, holder });
        }
        if let Some(inbound) = self.inbound_to(gate) {
            return Err(SpawnError::NodeBusy { node: gate, holder: inbound });
        }

        let route = self.planner.plan(graph, gate, runway)?;
        let aircraft = Aircraft::new(init, Itinerary::from_route(&route), graph)?;

        let claim = Claim::node(gate);
        match self.state.occupancy.request_directed(aircraft.id, claim, TimeWindow::open_from(now)) {
            Decision::Granted => Ok(aircraft),
            Decision::Denied(d) => Err(SpawnError::NodeBusy { node: gate, holder: d.reason.blocker() }),
        }
    }

    fn admit_arrival(&mut self, mut init: AircraftInit, runway: NodeId) -> Result<Aircraft, SpawnError> {
        let graph = &self.graph;
        if graph.node(runway).kind != NodeKind::RunwayThreshold {
            return Err(SpawnError::NotASpawnNode(runway));
        }
        let rollout = graph.runway_rollout(runway);
        let stopping_m = stopping_distance(
            self.config.touchdown_speed_mps,
            self.config.taxi_speed_mps,
            self.config.max_deceleration_mps2,
        );
        let exit = select_exit(graph, &rollout, stopping_m).ok_or(SpawnError::NoRunwayExit(runway))?;

        // Free gates first, each group in a per-aircraft random order.
        let mut rng = AircraftRng::new(init.global_seed, init.seed);
        let mut gates = graph.nodes_of_kind(NodeKind::Gate);
        gates.shuffle(rng.inner());
        let now = self.clock.current_tick;
        gates.sort_by_key(|&g| {
            self.state.occupancy.query(Element::Node(g), now).is_some() || self.inbound_to(g).is_some()
        });

        let mut itinerary = exit.itinerary(&rollout);
        let mut last_err = SpawnError::NoPath { from: exit.exit, to: runway };
        let mut taxi = None;
        for &gate in &gates {
            match self.planner.plan(graph, exit.exit, gate) {
                Ok(route) => {
                    taxi = Some(route);
                    break;
                }
                Err(e) => last_err = e.into(),
            }
        }
        let taxi = taxi.ok_or(last_err)?;
        itinerary.extend(&taxi)?;

        init.initial_speed = self.config.touchdown_speed_mps;
        let mut aircraft = Aircraft::new(init, itinerary, graph)?;
        aircraft.runway_exit = Some(exit.exit);
        debug!(
            "{now}: {} will leave runway at {} ({:.0} m, stopping needs {stopping_m:.0} m)",
            aircraft.id,
            graph.node(exit.exit).name,
            exit.distance_m
        );

        // The whole runway line must be clear, not just the part rolled over.
        for &edge in &rollout.edges {
            if let Some(holder) = self.state.occupancy.query(Element::Edge(edge), now) {
                return Err(SpawnError::NodeBusy { node: runway, holder });
            }
        }
        let claims = aircraft.required_claims(graph);
        match self.state.occupancy.request_all(aircraft.id, &claims, TimeWindow::open_from(now)) {
            Decision::Granted => Ok(aircraft),
            Decision::Denied(d) => Err(SpawnError::NodeBusy { node: runway, holder: d.reason.blocker() }),
        }
    }

    /// An active arrival whose destination is `gate`.
    fn inbound_to(&self, gate: NodeId) -> Option<AircraftId> {
        self.state
            .aircraft
            .values()
            .find(|a| a.kind == FlightKind::Arrival && a.destination() == gate)
            .map(|a| a.id)
    }

    fn commit_spawn(&mut self, mut aircraft: Aircraft, node: NodeId) -> AircraftId {
        let now = self.clock.current_tick;
        let id = aircraft.id;
        info!(
            "{now}: spawned {id} ({}{}) at {}, bound for {}",
            aircraft.kind,
            if aircraft.emergency { ", emergency" } else { "" },
            self.graph.node(node).name,
            self.graph.node(aircraft.destination()).name
        );
        self.events.push(SimEvent::Spawned {
            tick:        now,
            aircraft:    id,
            kind:        aircraft.kind,
            emergency:   aircraft.emergency,
            node,
            destination: aircraft.destination(),
        });
        issue_clearance(now, &mut aircraft, &self.graph, &mut self.events);

        self.state.aircraft.insert(id, aircraft);
        self.next_id += 1;
        self.spawned_since_step += 1;
        self.stats.spawned += 1;
        id
    }
}
