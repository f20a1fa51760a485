//! The `Simulation` struct and its tick loop.

use std::collections::BTreeMap;

use log::{debug, info, trace, warn};

use gtc_agent::{Aircraft, LifecycleState, MotionLimits, Proposal, is_exclusive_element};
use gtc_core::{AircraftId, SimClock, Tick, TimeWindow, TrafficConfig};
use gtc_graph::{AirportGraph, PathPlanner};
use gtc_occupancy::{ClaimRequest, ConflictResolver, Decision, Denial, Element, OccupancyManager};

use crate::clearance::next_clearance;
use crate::feed::{AircraftSnapshot, DespawnReason, SimEvent, SimStats, TickSummary};
use crate::generator::TrafficGenerator;
use crate::index::EdgeTraffic;
use crate::{SimError, SimResult, TrafficObserver};

/// Slack when testing whether an aircraft has reached its hold point.
const AT_HOLD_M: f64 = 1e-9;

// ── SimulationState ───────────────────────────────────────────────────────────

/// The only mutable state shared between aircraft: the reservation table and
/// the active-aircraft set.  Mutated exclusively by the serial phases of
/// [`Simulation::step`].
pub struct SimulationState {
    pub occupancy: OccupancyManager,
    /// Active aircraft, iterated in ascending id order.
    pub aircraft:  BTreeMap<AircraftId, Aircraft>,
}

impl SimulationState {
    pub fn active_count(&self) -> usize {
        self.aircraft.len()
    }

    pub fn holding_count(&self) -> usize {
        self.aircraft.values().filter(|a| a.state == LifecycleState::HoldingShort).count()
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The simulation clock: owns the graph, the planner and the state, and
/// advances everything one tick at a time.
///
/// Each [`step`](Self::step) runs three phases:
///
/// 1. **Propose** (optionally parallel with the `parallel` feature): every
///    aircraft computes its intended motion and the claims it needs against
///    a read-only snapshot of the start of the tick.
/// 2. **Commit** (serial): the [`ConflictResolver`] orders the tick's claims
///    by right of way and commits them to the [`OccupancyManager`] as one
///    batch.
/// 3. **Integrate** (serial, ascending `AircraftId`): each aircraft applies
///    its decision, releases what it has finished with, and is despawned on
///    arrival or stuck timeout.  Persistent denials trigger a replan.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<P: PathPlanner> {
    pub config:                    TrafficConfig,
    pub clock:                     SimClock,
    pub state:                     SimulationState,
    pub(crate) graph:              AirportGraph,
    pub(crate) planner:            P,
    pub(crate) resolver:           ConflictResolver,
    pub(crate) limits:             MotionLimits,
    pub(crate) next_id:            u32,
    pub(crate) events:             Vec<SimEvent>,
    pub(crate) spawned_since_step: usize,
    pub(crate) stats:              SimStats,
    pub(crate) last_summary:       TickSummary,
}

impl<P: PathPlanner> Simulation<P> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn graph(&self) -> &AirportGraph {
        &self.graph
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// The tick the next `step` will process.
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn active_count(&self) -> usize {
        self.state.active_count()
    }

    pub fn aircraft(&self, id: AircraftId) -> Option<&Aircraft> {
        self.state.aircraft.get(&id)
    }

    pub fn occupancy(&self) -> &OccupancyManager {
        &self.state.occupancy
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Counters of the most recent tick.
    pub fn last_summary(&self) -> &TickSummary {
        &self.last_summary
    }

    /// Events recorded since the last drain.  `run_*` drain them into the
    /// observer; callers driving `step` directly must drain them themselves.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshots of every active aircraft as things stand, without stepping.
    pub fn snapshots(&self) -> Vec<AircraftSnapshot> {
        let tick = self.now();
        self.state.aircraft.values().map(|ac| snapshot(tick, ac, &self.graph)).collect()
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Advance one tick of the configured duration.
    pub fn tick(&mut self) -> SimResult<Vec<AircraftSnapshot>> {
        self.step(self.config.tick_duration_secs)
    }

    /// Advance one tick of `dt` simulated seconds and return a snapshot of
    /// every aircraft that was active during it.
    pub fn step(&mut self, dt: f64) -> SimResult<Vec<AircraftSnapshot>> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTickDuration(dt));
        }
        let now = self.clock.current_tick;
        let limits = MotionLimits { dt, ..self.limits };
        let mut summary = TickSummary {
            tick: now,
            spawned: std::mem::take(&mut self.spawned_since_step),
            ..TickSummary::default()
        };

        // ── Phase 1: propose ──────────────────────────────────────────────
        let proposals = self.propose_all(&limits);

        // ── Phase 2: commit ───────────────────────────────────────────────
        let requests: Vec<ClaimRequest> = proposals
            .iter()
            .filter(|p| p.needs_decision())
            .filter_map(|p| {
                let ac = self.state.aircraft.get(&p.aircraft)?;
                Some(ClaimRequest {
                    aircraft:   p.aircraft,
                    priority:   ac.priority(),
                    spawn_tick: ac.spawn_tick,
                    claims:     p.claims.clone(),
                })
            })
            .collect();
        let resolution = self.resolver.resolve(requests, &mut self.state.occupancy, TimeWindow::open_from(now));
        summary.contested = resolution.contested.len();
        let decisions: BTreeMap<AircraftId, Decision> = resolution.outcomes.into_iter().collect();

        // ── Phase 3: integrate ────────────────────────────────────────────
        //
        // Proposals come out of the BTreeMap in ascending id order; applying
        // them in that order keeps the tick deterministic.
        let mut snapshots = Vec::with_capacity(proposals.len());
        for proposal in &proposals {
            let decision = decisions.get(&proposal.aircraft);
            if let Some(snap) = self.integrate(now, &limits, proposal, decision, &mut summary) {
                snapshots.push(snap);
            }
        }

        summary.active = self.state.active_count();
        summary.holding = self.state.holding_count();
        self.stats.grants += summary.grants as u64;
        self.stats.denials += summary.denials as u64;
        trace!(
            "{now}: {} active, {} grants, {} denials, {} contested",
            summary.active, summary.grants, summary.denials, summary.contested
        );
        self.last_summary = summary;
        self.clock.advance();
        Ok(snapshots)
    }

    /// Run exactly `n` ticks, reporting to `observer`.
    pub fn run_ticks<O: TrafficObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_tick(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run until no aircraft is active or `max_ticks` have passed.  Returns
    /// the number of ticks run.
    pub fn run_until_idle<O: TrafficObserver>(&mut self, max_ticks: u64, observer: &mut O) -> SimResult<u64> {
        let mut ran = 0;
        while ran < max_ticks && self.active_count() > 0 {
            self.observed_tick(observer)?;
            ran += 1;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(ran)
    }

    /// Run `n` ticks, letting `traffic` spawn aircraft before each one.
    pub fn run_with_traffic<O: TrafficObserver>(
        &mut self,
        n:        u64,
        traffic:  &mut TrafficGenerator,
        observer: &mut O,
    ) -> SimResult<()> {
        for _ in 0..n {
            traffic.spawn_due(self);
            self.observed_tick(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    fn observed_tick<O: TrafficObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let snapshots = self.tick()?;
        for event in self.events.drain(..) {
            observer.on_event(&event);
        }
        if now.0.is_multiple_of(self.config.output_interval_ticks) {
            observer.on_snapshot(now, &snapshots);
        }
        observer.on_tick_end(&self.last_summary);
        Ok(())
    }

    // ── Phases ────────────────────────────────────────────────────────────

    fn propose_all(&self, limits: &MotionLimits) -> Vec<Proposal> {
        let graph = &self.graph;
        let traffic = EdgeTraffic::build(graph, self.state.aircraft.values());

        #[cfg(not(feature = "parallel"))]
        {
            self.state
                .aircraft
                .values()
                .map(|ac| ac.propose(graph, limits, &traffic))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let fleet: Vec<&Aircraft> = self.state.aircraft.values().collect();
            fleet
                .par_iter()
                .map(|ac| ac.propose(graph, limits, &traffic))
                .collect()
        }
    }

    /// Apply one aircraft's decision.  Returns its end-of-tick snapshot.
    fn integrate(
        &mut self,
        now:      Tick,
        limits:   &MotionLimits,
        proposal: &Proposal,
        decision: Option<&Decision>,
        summary:  &mut TickSummary,
    ) -> Option<AircraftSnapshot> {
        let id = proposal.aircraft;
        let graph = &self.graph;
        let occupancy = &mut self.state.occupancy;
        let ac = self.state.aircraft.get_mut(&id)?;
        let was_on_rollout = ac.on_rollout();

        let out = ac.apply(graph, limits, proposal, decision);
        match decision {
            Some(Decision::Granted) => {
                summary.grants += 1;
                let runway_access = proposal
                    .claims
                    .iter()
                    .any(|c| matches!(c.element, Element::Edge(e) if graph.edge(e).runway));
                if runway_access && !was_on_rollout {
                    let elements: Vec<Element> = proposal
                        .claims
                        .iter()
                        .map(|c| c.element)
                        .filter(|&el| is_exclusive_element(graph, el))
                        .collect();
                    debug!("{now}: {id} cleared onto {}", describe(&elements));
                    self.events.push(SimEvent::Granted { tick: now, aircraft: id, elements });
                }
            }
            Some(Decision::Denied(_)) => summary.denials += 1,
            None => {}
        }

        for &el in &out.release {
            occupancy.release(id, el);
        }

        if out.arrived {
            let snap = snapshot(now, ac, graph);
            info!("{now}: {id} arrived at {}", graph.node(ac.destination()).name);
            self.despawn(now, id, DespawnReason::Arrived, summary);
            self.stats.arrived += 1;
            return Some(snap);
        }

        if ac.is_moving_on_route() {
            occupancy.update_progress(id, Element::Edge(ac.current_edge()), ac.distance_m, ac.velocity_mps);
        }

        if let Some(Denial { element, reason }) = out.denial.filter(|_| out.held_short) {
            debug!("{now}: {id} holding short of {element}, {reason}");
            self.events.push(SimEvent::HoldingShort {
                tick: now,
                aircraft: id,
                element,
                blocker: reason.blocker(),
            });
        }

        if out.passed_node.is_some() && ac.leg() == ac.cleared_until {
            issue_clearance(now, ac, graph, &mut self.events);
        }

        // ── Adaptive replanning ───────────────────────────────────────────
        if ac.denied_streak >= self.config.replan_after_denials
            && !ac.is_final_leg()
            && !ac.on_rollout()
            && ac.is_moving_on_route()
            && ac.distance_m + AT_HOLD_M >= ac.hold_point_m(graph, limits)
        {
            if let Some(Denial { element: Element::Edge(blocked), .. }) = ac.last_denial {
                let avoid = [blocked, ac.current_edge()];
                match self.planner.plan_avoiding(graph, ac.next_node(), ac.destination(), &avoid) {
                    Ok(tail) => match ac.splice_route(&tail) {
                        Ok(()) => {
                            let keep = ac.required_elements(graph);
                            let stale: Vec<Element> =
                                occupancy.held_by(id).filter(|el| !keep.contains(el)).collect();
                            for el in stale {
                                occupancy.release(id, el);
                            }
                            info!("{now}: {id} replanned around {blocked}, {} legs to go", tail.edges.len());
                            self.events.push(SimEvent::Replanned {
                                tick:       now,
                                aircraft:   id,
                                avoided:    blocked,
                                route_tail: tail.nodes.clone(),
                            });
                            summary.replans += 1;
                            self.stats.replans += 1;
                        }
                        Err(e) => debug!("{now}: {id} replan rejected: {e}"),
                    },
                    Err(e) => debug!("{now}: {id} has no way around {blocked}: {e}"),
                }
            }
            ac.denied_streak = 0;
        }

        // ── Stuck detection ───────────────────────────────────────────────
        if ac.idle_ticks >= self.config.stuck_timeout_ticks {
            let (edge, idle_ticks) = (ac.current_edge(), ac.idle_ticks);
            ac.state = LifecycleState::Despawned;
            let snap = snapshot(now, ac, graph);
            warn!("{now}: stuck fault, {id} made no progress for {idle_ticks} ticks on {edge}");
            self.events.push(SimEvent::StuckFault { tick: now, aircraft: id, idle_ticks, edge });
            self.despawn(now, id, DespawnReason::Stuck, summary);
            summary.stuck_faults += 1;
            self.stats.stuck_faults += 1;
            return Some(snap);
        }

        Some(snapshot(now, ac, graph))
    }

    /// Remove `id` and everything it holds.
    fn despawn(&mut self, now: Tick, id: AircraftId, reason: DespawnReason, summary: &mut TickSummary) {
        let released = self.state.occupancy.release_all(id);
        self.state.aircraft.remove(&id);
        trace!("{now}: {id} released {} elements", released.len());
        self.events.push(SimEvent::Despawned { tick: now, aircraft: id, reason });
        summary.despawned += 1;
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

pub(crate) fn snapshot(tick: Tick, ac: &Aircraft, graph: &AirportGraph) -> AircraftSnapshot {
    AircraftSnapshot {
        tick,
        id:           ac.id,
        kind:         ac.kind,
        emergency:    ac.emergency,
        state:        ac.state,
        position:     ac.position(graph),
        heading_deg:  ac.heading_deg,
        velocity_mps: ac.velocity_mps,
        edge:         ac.current_edge(),
        progress:     ac.progress(graph),
    }
}

/// Clear `ac` from its current node to the next decision point.
pub(crate) fn issue_clearance(now: Tick, ac: &mut Aircraft, graph: &AirportGraph, events: &mut Vec<SimEvent>) {
    let Some(c) = next_clearance(graph, ac, ac.leg()) else { return };
    ac.cleared_until = c.until;
    let until = ac.route()[c.until];
    debug!("{now}: {}: {}", ac.id, c.text);
    events.push(SimEvent::Clearance { tick: now, aircraft: ac.id, until, text: c.text });
}

fn describe(elements: &[Element]) -> String {
    elements.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
