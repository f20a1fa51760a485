//! Per-aircraft state.
//!
//! An [`Aircraft`] owns its kinematic state (distance along the current
//! edge, velocity, heading), its lifecycle state, and the bookkeeping that
//! ties it to its reservations.  It never touches the occupancy table
//! itself: the propose/apply pair in [`crate::motion`] reports what should
//! be requested and released, and the simulation commits it.

use gtc_core::{AircraftId, EdgeId, FlightKind, NodeId, Point, PriorityClass, Tick};
use gtc_graph::{AirportGraph, Route};
use gtc_occupancy::{Claim, Denial, Direction, Element};

use crate::error::{AgentError, AgentResult};
use crate::itinerary::Itinerary;
use crate::kinematics::blended_heading;
use crate::state::LifecycleState;

/// Identity and seeding for a new aircraft.
#[derive(Clone, Debug)]
pub struct AircraftInit {
    pub id:             AircraftId,
    pub kind:           FlightKind,
    pub emergency:      bool,
    pub spawn_tick:     Tick,
    /// Per-aircraft seed; with `global_seed` it drives the gate choice of
    /// an arrival.
    pub seed:           u64,
    pub global_seed:    u64,
    /// Speed at spawn: touchdown speed for arrivals, zero at a gate.
    pub initial_speed:  f64,
}

#[derive(Clone, Debug)]
pub struct Aircraft {
    pub id:            AircraftId,
    pub kind:          FlightKind,
    pub emergency:     bool,
    pub state:         LifecycleState,
    pub spawn_tick:    Tick,
    pub seed:          u64,

    /// Metres travelled along the current edge from `route[leg]`.
    pub distance_m:    f64,
    pub velocity_mps:  f64,
    pub heading_deg:   f64,

    /// Consecutive ticks with a refused request.
    pub denied_streak: u32,
    /// Consecutive ticks without forward motion.
    pub idle_ticks:    u64,
    pub last_denial:   Option<Denial>,
    /// Runway exit chosen at touchdown (arrivals only).
    pub runway_exit:   Option<NodeId>,
    /// Route index of the node the current clearance ends at.
    pub cleared_until: usize,

    pub(crate) route:        Vec<NodeId>,
    pub(crate) route_edges:  Vec<EdgeId>,
    pub(crate) leg:          usize,
    pub(crate) rollout_legs: usize,
    /// Holds `route_edges[leg]`.
    pub(crate) on_edge:      bool,
    /// Holds whatever is needed to pass the end of the current edge.
    pub(crate) next_granted: bool,
    /// Exclusive node behind the aircraft not yet cleared by separation.
    pub(crate) node_hold:    Option<NodeId>,
}

impl Aircraft {
    /// Build an aircraft at the start of `itinerary`.
    ///
    /// Arrivals (itineraries with a rollout) start on their first edge; the
    /// caller must already hold the rollout reservations.  Departures start
    /// at the spawn node and claim their first edge on the first tick.
    pub fn new(init: AircraftInit, itinerary: Itinerary, graph: &AirportGraph) -> AgentResult<Self> {
        itinerary.validate(graph)?;
        let origin = itinerary.nodes[0];
        let first = itinerary.edges[0];
        let node_hold = graph.node(origin).kind.is_exclusive().then_some(origin);

        Ok(Aircraft {
            id:            init.id,
            kind:          init.kind,
            emergency:     init.emergency,
            state:         LifecycleState::Spawned,
            spawn_tick:    init.spawn_tick,
            seed:          init.seed,
            distance_m:    0.0,
            velocity_mps:  init.initial_speed.max(0.0),
            heading_deg:   graph.edge_heading(first, origin),
            denied_streak: 0,
            idle_ticks:    0,
            last_denial:   None,
            runway_exit:   None,
            cleared_until: 0,
            on_edge:       itinerary.rollout_legs > 0,
            next_granted:  false,
            node_hold,
            route:         itinerary.nodes,
            route_edges:   itinerary.edges,
            leg:           0,
            rollout_legs:  itinerary.rollout_legs,
        })
    }

    // ── Route ─────────────────────────────────────────────────────────────

    pub fn route(&self) -> &[NodeId] {
        &self.route
    }

    pub fn route_edges(&self) -> &[EdgeId] {
        &self.route_edges
    }

    /// Index of the current leg: the aircraft is between `route[leg]` and
    /// `route[leg + 1]`.
    pub fn leg(&self) -> usize {
        self.leg
    }

    pub fn destination(&self) -> NodeId {
        self.route[self.route.len() - 1]
    }

    pub fn current_edge(&self) -> EdgeId {
        self.route_edges[self.leg]
    }

    /// Node the current edge was entered from.
    pub fn from_node(&self) -> NodeId {
        self.route[self.leg]
    }

    /// Node at the end of the current edge.
    pub fn next_node(&self) -> NodeId {
        self.route[self.leg + 1]
    }

    pub fn next_edge(&self) -> Option<EdgeId> {
        self.route_edges.get(self.leg + 1).copied()
    }

    pub fn is_final_leg(&self) -> bool {
        self.leg + 1 == self.route_edges.len()
    }

    /// Number of leading legs flown as the arrival rollout.
    pub fn rollout_legs(&self) -> usize {
        self.rollout_legs
    }

    /// Still on the arrival rollout (including a turnoff spur).
    pub fn on_rollout(&self) -> bool {
        self.leg < self.rollout_legs
    }

    /// Has entered its first edge.
    pub fn is_moving_on_route(&self) -> bool {
        self.on_edge
    }

    pub fn priority(&self) -> PriorityClass {
        PriorityClass::of(self.kind, self.emergency)
    }

    /// Travel direction on `route_edges[leg]` relative to its declaration.
    pub fn direction_on(&self, graph: &AirportGraph, leg: usize) -> Direction {
        let edge = graph.edge(self.route_edges[leg]);
        Direction::from_forward(edge.is_forward_from(self.route[leg]))
    }

    pub fn direction(&self, graph: &AirportGraph) -> Direction {
        self.direction_on(graph, self.leg)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    pub fn position(&self, graph: &AirportGraph) -> Point {
        graph.position_on_edge(self.current_edge(), self.from_node(), self.distance_m)
    }

    /// Fraction of the current edge covered, in `[0, 1]`.
    pub fn progress(&self, graph: &AirportGraph) -> f64 {
        let len = graph.edge(self.current_edge()).length_m;
        if len > 0.0 { (self.distance_m / len).clamp(0.0, 1.0) } else { 1.0 }
    }

    pub fn remaining_m(&self, graph: &AirportGraph) -> f64 {
        (graph.edge(self.current_edge()).length_m - self.distance_m).max(0.0)
    }

    /// Heading at the current position, eased through the nodes either end.
    pub fn heading_at(&self, graph: &AirportGraph, blend_m: f64) -> f64 {
        let edge = self.current_edge();
        let current = graph.edge_heading(edge, self.from_node());
        let previous = self
            .leg
            .checked_sub(1)
            .map(|p| graph.edge_heading(self.route_edges[p], self.route[p]));
        let next = self
            .next_edge()
            .map(|n| graph.edge_heading(n, self.route[self.leg + 1]));
        blended_heading(previous, current, next, self.distance_m, graph.edge(edge).length_m, blend_m)
    }

    // ── Reservations ──────────────────────────────────────────────────────

    /// What must be held to pass the end of the current edge: the node
    /// there if it is exclusive, plus the next edge.
    pub fn end_claims(&self, graph: &AirportGraph) -> Vec<Claim> {
        let node = self.next_node();
        let mut claims = Vec::with_capacity(2);
        if graph.node(node).kind.is_exclusive() {
            claims.push(Claim::node(node));
        }
        if let Some(edge) = self.next_edge() {
            claims.push(Claim::edge(edge, self.direction_on(graph, self.leg + 1)));
        }
        claims
    }

    /// Claims this aircraft is entitled to hold right now.  Anything else
    /// it holds is stale.  At touchdown this is the whole rollout.
    pub fn required_claims(&self, graph: &AirportGraph) -> Vec<Claim> {
        let mut out = Vec::new();
        if let Some(n) = self.node_hold {
            out.push(Claim::node(n));
        }
        if self.on_edge {
            out.push(Claim::edge(self.current_edge(), self.direction(graph)));
        }
        for leg in self.leg + 1..self.rollout_legs {
            out.push(Claim::node(self.route[leg]));
            out.push(Claim::edge(self.route_edges[leg], self.direction_on(graph, leg)));
        }
        out
    }

    pub fn required_elements(&self, graph: &AirportGraph) -> Vec<Element> {
        self.required_claims(graph).into_iter().map(|c| c.element).collect()
    }

    // ── Replanning ────────────────────────────────────────────────────────

    /// Replace everything beyond the end of the current edge with `tail`,
    /// which must start at that node and end at the same destination.
    pub fn splice_route(&mut self, tail: &Route) -> AgentResult<()> {
        let join = self.next_node();
        if tail.origin() != Some(join) || tail.destination() != Some(self.destination()) {
            return Err(AgentError::InvalidRoute(format!(
                "replacement route must run from {join} to {}",
                self.destination()
            )));
        }
        if self.on_rollout() {
            return Err(AgentError::InvalidRoute("cannot replan during the rollout".into()));
        }
        self.route.truncate(self.leg + 2);
        self.route_edges.truncate(self.leg + 1);
        self.route.extend_from_slice(&tail.nodes[1..]);
        self.route_edges.extend_from_slice(&tail.edges);
        self.next_granted = false;
        // The old clearance now ends at the join node.
        self.cleared_until = self.leg + 1;
        Ok(())
    }
}
