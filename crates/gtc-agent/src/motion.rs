//! One tick of aircraft motion, split in two.
//!
//! [`Aircraft::propose`] is a pure function of the aircraft, the graph and
//! a read-only [`TrafficView`] of the start-of-tick snapshot.  It says how
//! far the aircraft would like to move and which claims it needs to do so.
//! Claims on the next node are made from the hold point, one separation
//! short of it; an aircraft whose claims are refused stops there and never
//! stands on a node it does not hold.
//! [`Aircraft::apply`] then takes the committed decision and moves the
//! aircraft, reporting which reservations it has finished with.

use gtc_core::{AircraftId, EdgeId, FlightKind, NodeId, TrafficConfig};
use gtc_graph::AirportGraph;
use gtc_occupancy::{Claim, Decision, Denial, Direction, Element};

use crate::aircraft::Aircraft;
use crate::kinematics::{EPS_M, decelerate};
use crate::state::LifecycleState;

/// The subset of `TrafficConfig` the motion model reads.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionLimits {
    pub dt:                    f64,
    pub min_separation_m:      f64,
    pub max_deceleration_mps2: f64,
    pub taxi_speed_mps:        f64,
    pub turn_blend_m:          f64,
}

impl MotionLimits {
    pub fn from_config(config: &TrafficConfig) -> Self {
        MotionLimits {
            dt:                    config.tick_duration_secs,
            min_separation_m:      config.min_taxi_separation_m,
            max_deceleration_mps2: config.max_deceleration_mps2,
            taxi_speed_mps:        config.taxi_speed_mps,
            turn_blend_m:          config.turn_blend_m,
        }
    }
}

impl From<&TrafficConfig> for MotionLimits {
    fn from(config: &TrafficConfig) -> Self {
        MotionLimits::from_config(config)
    }
}

/// Read-only view of where everyone was at the start of the tick.
pub trait TrafficView {
    /// Distance of the nearest aircraft other than `me` on `edge`,
    /// travelling `direction`, at or beyond `from_m`.
    fn nearest_ahead(&self, edge: EdgeId, direction: Direction, from_m: f64, me: AircraftId) -> Option<f64>;
}

/// A view with no traffic in it.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyTraffic;

impl TrafficView for EmptyTraffic {
    fn nearest_ahead(&self, _: EdgeId, _: Direction, _: f64, _: AircraftId) -> Option<f64> {
        None
    }
}

/// What an aircraft intends this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub aircraft:         AircraftId,
    /// Claims to submit; empty if none are needed.
    pub claims:           Vec<Claim>,
    /// Distance along the current edge, never past its end.
    pub advance_m:        f64,
    /// Distance along the current edge if the end claims are refused.
    pub hold_advance_m:   f64,
    /// Distance into the next edge if the end claims are granted.
    pub carry_m:          f64,
    /// Unconstrained motion budget for the tick.
    pub reach_m:          f64,
    pub end_velocity_mps: f64,
    pub reaches_end:      bool,
    /// `claims` includes the reservations beyond the end of the edge.
    pub claims_end:       bool,
}

impl Proposal {
    pub fn needs_decision(&self) -> bool {
        !self.claims.is_empty()
    }
}

/// What happened when a proposal was applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub moved_m:     f64,
    pub granted:     bool,
    pub denial:      Option<Denial>,
    /// Node crossed this tick.
    pub passed_node: Option<NodeId>,
    /// Reservations the aircraft no longer needs.
    pub release:     Vec<Element>,
    /// Entered `HoldingShort` this tick.
    pub held_short:  bool,
    /// Reached its destination node.
    pub arrived:     bool,
}

impl Aircraft {
    // ── Propose ───────────────────────────────────────────────────────────

    /// Distance available this tick and the velocity at the end of it,
    /// ignoring other traffic.
    pub fn motion_budget(&self, graph: &AirportGraph, limits: &MotionLimits) -> (f64, f64) {
        let edge = graph.edge(self.current_edge());
        if self.on_rollout() {
            let floor = limits.taxi_speed_mps.min(edge.max_speed_mps);
            if self.velocity_mps > floor + EPS_M {
                return decelerate(self.velocity_mps, limits.max_deceleration_mps2, floor, limits.dt);
            }
            return (floor * limits.dt, floor);
        }
        (edge.max_speed_mps * limits.dt, edge.max_speed_mps)
    }

    /// Where the aircraft stops on its current edge while the next node is
    /// not yet granted.
    pub fn hold_point_m(&self, graph: &AirportGraph, limits: &MotionLimits) -> f64 {
        let len = graph.edge(self.current_edge()).length_m;
        len - limits.min_separation_m.min(len)
    }

    pub fn propose<T: TrafficView + ?Sized>(
        &self,
        graph:   &AirportGraph,
        limits:  &MotionLimits,
        traffic: &T,
    ) -> Proposal {
        let edge = self.current_edge();
        let direction = self.direction(graph);
        let (reach_m, end_velocity_mps) = self.motion_budget(graph, limits);
        let remaining = self.remaining_m(graph);

        let mut advance_m = reach_m.min(remaining);
        if let Some(lead) = traffic.nearest_ahead(edge, direction, self.distance_m, self.id) {
            advance_m = advance_m.min((lead - limits.min_separation_m - self.distance_m).max(0.0));
        }
        let reaches_end = remaining - advance_m <= EPS_M;
        let hold_at = self.hold_point_m(graph, limits);
        let claims_end = !self.next_granted && self.distance_m + advance_m + EPS_M >= hold_at;
        let hold_advance_m = (hold_at - self.distance_m).min(advance_m).max(0.0);

        let mut claims = Vec::new();
        if !self.on_edge {
            claims.push(Claim::edge(edge, direction));
        }
        if claims_end {
            claims.extend(self.end_claims(graph));
        }

        let mut carry_m = 0.0;
        if let Some(next) = self.next_edge().filter(|_| reaches_end) {
            let next_dir = self.direction_on(graph, self.leg + 1);
            let mut room = graph.edge(next).length_m;
            if let Some(lead) = traffic.nearest_ahead(next, next_dir, 0.0, self.id) {
                room = room.min((lead - limits.min_separation_m).max(0.0));
            }
            carry_m = (reach_m - advance_m).max(0.0).min(room);
        }

        Proposal {
            aircraft: self.id,
            claims,
            advance_m,
            hold_advance_m,
            carry_m,
            reach_m,
            end_velocity_mps,
            reaches_end,
            claims_end,
        }
    }

    // ── Apply ─────────────────────────────────────────────────────────────

    /// Move according to `proposal` and the decision taken on its claims
    /// (`None` when it made none).  Crosses at most one node.
    pub fn apply(
        &mut self,
        graph:    &AirportGraph,
        limits:   &MotionLimits,
        proposal: &Proposal,
        decision: Option<&Decision>,
    ) -> StepOutcome {
        let mut out = StepOutcome::default();
        let granted = match decision {
            Some(Decision::Granted) => {
                out.granted = true;
                true
            }
            Some(Decision::Denied(d)) => {
                out.denial = Some(*d);
                false
            }
            None => !proposal.needs_decision(),
        };
        if out.granted {
            self.denied_streak = 0;
            self.last_denial = None;
        }
        if let Some(d) = out.denial {
            self.denied_streak = self.denied_streak.saturating_add(1);
            self.last_denial = Some(d);
        }

        if !self.on_edge {
            if !granted {
                self.velocity_mps = 0.0;
                self.idle_ticks += 1;
                return out;
            }
            self.on_edge = true;
        }
        let blocked = proposal.claims_end && !granted;
        if proposal.claims_end && granted {
            self.next_granted = true;
        }

        let len = graph.edge(self.current_edge()).length_m;
        let mut moved = if blocked { proposal.hold_advance_m } else { proposal.advance_m };
        self.distance_m = (self.distance_m + moved).min(len);

        if proposal.reaches_end && self.next_granted {
            self.distance_m = len;
            if self.is_final_leg() {
                self.state = LifecycleState::Despawned;
                self.velocity_mps = moved / limits.dt;
                self.idle_ticks = 0;
                out.moved_m = moved;
                out.arrived = true;
                return out;
            }
            out.release.push(Element::Edge(self.current_edge()));
            if let Some(held) = self.node_hold.take() {
                out.release.push(Element::Node(held));
            }
            let node = self.next_node();
            if graph.node(node).kind.is_exclusive() {
                self.node_hold = Some(node);
            }
            self.leg += 1;
            self.next_granted = false;
            self.distance_m = proposal.carry_m;
            moved += proposal.carry_m;
            out.passed_node = Some(node);
        }

        if let Some(held) = self.node_hold {
            let clear_at = limits.min_separation_m.min(graph.edge(self.current_edge()).length_m);
            if self.distance_m + EPS_M >= clear_at {
                self.node_hold = None;
                out.release.push(Element::Node(held));
            }
        }

        self.velocity_mps = if blocked {
            0.0
        } else if moved + EPS_M >= proposal.reach_m {
            proposal.end_velocity_mps
        } else {
            moved / limits.dt
        };
        if moved <= EPS_M {
            self.idle_ticks += 1;
        } else {
            self.idle_ticks = 0;
        }
        self.heading_deg = self.heading_at(graph, limits.turn_blend_m);

        let before = self.state;
        self.state = self.derive_state(graph, limits, if blocked { out.denial } else { None });
        out.held_short = self.state == LifecycleState::HoldingShort && before != LifecycleState::HoldingShort;
        out.moved_m = moved;
        out
    }

    fn derive_state(&self, graph: &AirportGraph, limits: &MotionLimits, blocked_by: Option<Denial>) -> LifecycleState {
        if blocked_by.is_some_and(|d| is_exclusive_element(graph, d.element)) {
            return LifecycleState::HoldingShort;
        }
        let edge = graph.edge(self.current_edge());
        if self.on_rollout() {
            if self.velocity_mps > limits.taxi_speed_mps + 1e-6 {
                LifecycleState::Decelerating
            } else {
                LifecycleState::ExitingRunway
            }
        } else if edge.runway {
            let runway_to_the_end = self.route_edges[self.leg..].iter().all(|&e| graph.edge(e).runway);
            if self.kind == FlightKind::Departure && runway_to_the_end {
                LifecycleState::Departing
            } else {
                LifecycleState::Crossing
            }
        } else if self.is_final_leg() {
            LifecycleState::Exiting
        } else {
            LifecycleState::Taxiing
        }
    }
}

/// Mirrors the occupancy policy table: exclusive nodes are every kind but
/// taxiway points, exclusive edges are runways.
pub fn is_exclusive_element(graph: &AirportGraph, element: Element) -> bool {
    match element {
        Element::Node(n) => graph.get_node(n).is_none_or(|node| node.kind.is_exclusive()),
        Element::Edge(e) => graph.get_edge(e).is_none_or(|edge| edge.runway),
    }
}
