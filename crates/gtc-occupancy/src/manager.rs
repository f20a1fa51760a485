//! The reservation table.
//!
//! # Policy
//!
//! | Element                       | Policy      |
//! |-------------------------------|-------------|
//! | runway edge                   | `Exclusive` |
//! | taxiway edge                  | `Queued`    |
//! | taxiway-point node            | `Queued`    |
//! | any other node                | `Exclusive` |
//!
//! An exclusive element admits one holder per instant.  A queued edge admits
//! any number of holders travelling the same way, provided the newcomer
//! enters at least `min_separation_m` behind the nearest holder.  Queued
//! nodes are pass-through points: the separation is enforced on the edges
//! either side of them, so they never refuse a request.
//!
//! Holders report their along-edge progress with
//! [`OccupancyManager::update_progress`]; that distance is what the
//! separation rule measures.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use gtc_core::{AircraftId, Tick, TimeWindow};
use gtc_graph::AirportGraph;

use crate::element::{Claim, Decision, Denial, DenyReason, Direction, Element, Policy};

/// One granted reservation.
#[derive(Clone, Debug, PartialEq)]
pub struct Reservation {
    pub aircraft:   AircraftId,
    pub window:     TimeWindow,
    pub direction:  Direction,
    /// Progress from the entry end, in metres.  Always 0 for nodes.
    pub distance_m: f64,
    pub speed_mps:  f64,
}

pub struct OccupancyManager {
    node_policy:        Vec<Policy>,
    edge_policy:        Vec<Policy>,
    min_separation_m:   f64,
    tick_duration_secs: f64,
    table:              BTreeMap<Element, Vec<Reservation>>,
    held:               BTreeMap<AircraftId, BTreeSet<Element>>,
}

impl OccupancyManager {
    pub fn new(graph: &AirportGraph, min_separation_m: f64, tick_duration_secs: f64) -> Self {
        let node_policy = graph
            .nodes()
            .iter()
            .map(|n| if n.kind.is_exclusive() { Policy::Exclusive } else { Policy::Queued })
            .collect();
        let edge_policy = graph
            .edges()
            .iter()
            .map(|e| if e.runway { Policy::Exclusive } else { Policy::Queued })
            .collect();
        Self {
            node_policy,
            edge_policy,
            min_separation_m,
            tick_duration_secs,
            table: BTreeMap::new(),
            held:  BTreeMap::new(),
        }
    }

    // ── Policy ────────────────────────────────────────────────────────────

    /// Elements outside the graph are treated as exclusive.
    pub fn policy(&self, element: Element) -> Policy {
        let p = match element {
            Element::Node(n) => self.node_policy.get(n.index()),
            Element::Edge(e) => self.edge_policy.get(e.index()),
        };
        p.copied().unwrap_or(Policy::Exclusive)
    }

    #[inline]
    pub fn is_exclusive(&self, element: Element) -> bool {
        self.policy(element) == Policy::Exclusive
    }

    pub fn min_separation_m(&self) -> f64 {
        self.min_separation_m
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Would `aircraft` be granted `claim` over `window`?  Never mutates.
    pub fn check(&self, aircraft: AircraftId, claim: Claim, window: TimeWindow) -> Decision {
        let others = self
            .table
            .get(&claim.element)
            .into_iter()
            .flatten()
            .filter(|r| r.aircraft != aircraft && r.window.overlaps(&window));

        let deny = |reason| Decision::Denied(Denial { element: claim.element, reason });

        match (self.policy(claim.element), claim.element) {
            (Policy::Exclusive, _) => match others.min_by_key(|r| r.aircraft) {
                Some(r) => deny(DenyReason::Held { holder: r.aircraft }),
                None    => Decision::Granted,
            },
            (Policy::Queued, Element::Node(_)) => Decision::Granted,
            (Policy::Queued, Element::Edge(_)) => {
                let others: Vec<&Reservation> = others.collect();
                if let Some(r) = others.iter().find(|r| r.direction != claim.direction) {
                    return deny(DenyReason::HeadOn { holder: r.aircraft });
                }
                let nearest = others
                    .iter()
                    .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then(a.aircraft.cmp(&b.aircraft)));
                match nearest {
                    Some(r) if r.distance_m < self.min_separation_m => {
                        let retry_at = window.start.offset(self.ticks_to_clear(r));
                        deny(DenyReason::Separation { holder: r.aircraft, retry_at })
                    }
                    _ => Decision::Granted,
                }
            }
        }
    }

    /// Request a single element travelling `Forward`.
    pub fn request(&mut self, aircraft: AircraftId, element: Element, window: TimeWindow) -> Decision {
        self.request_directed(aircraft, Claim { element, direction: Direction::Forward }, window)
    }

    /// Request a single element.  Re-requesting an element the caller
    /// already holds over an overlapping window is granted without change.
    pub fn request_directed(&mut self, aircraft: AircraftId, claim: Claim, window: TimeWindow) -> Decision {
        self.request_all(aircraft, &[claim], window)
    }

    /// All-or-nothing request: either every claim is granted and committed,
    /// or nothing changes and the first denial is returned.
    pub fn request_all(&mut self, aircraft: AircraftId, claims: &[Claim], window: TimeWindow) -> Decision {
        for &claim in claims {
            let d = self.check(aircraft, claim, window);
            if !d.is_granted() {
                trace!("{aircraft} denied {}: {:?}", claim.element, d);
                return d;
            }
        }
        for &claim in claims {
            if self.holds_over(aircraft, claim.element, &window) {
                continue;
            }
            self.table.entry(claim.element).or_default().push(Reservation {
                aircraft,
                window,
                direction:  claim.direction,
                distance_m: 0.0,
                speed_mps:  0.0,
            });
            self.held.entry(aircraft).or_default().insert(claim.element);
            trace!("{aircraft} granted {} {window}", claim.element);
        }
        Decision::Granted
    }

    // ── Release ───────────────────────────────────────────────────────────

    /// Drop every reservation `aircraft` has on `element`.  Returns `true`
    /// if anything was released.
    pub fn release(&mut self, aircraft: AircraftId, element: Element) -> bool {
        let mut released = false;
        if let Some(list) = self.table.get_mut(&element) {
            let before = list.len();
            list.retain(|r| r.aircraft != aircraft);
            released = list.len() != before;
            if list.is_empty() {
                self.table.remove(&element);
            }
        }
        if let Some(set) = self.held.get_mut(&aircraft) {
            set.remove(&element);
            if set.is_empty() {
                self.held.remove(&aircraft);
            }
        }
        released
    }

    /// Drop everything `aircraft` holds; returns the released elements in
    /// ascending order.
    pub fn release_all(&mut self, aircraft: AircraftId) -> Vec<Element> {
        let elements: Vec<Element> = self
            .held
            .remove(&aircraft)
            .map(|s| s.into_iter().collect())
            .unwrap_or_default();
        for &el in &elements {
            if let Some(list) = self.table.get_mut(&el) {
                list.retain(|r| r.aircraft != aircraft);
                if list.is_empty() {
                    self.table.remove(&el);
                }
            }
        }
        elements
    }

    /// Drop reservations whose bounded window ended at or before `now`.
    /// Returns the number removed.
    pub fn expire(&mut self, now: Tick) -> usize {
        let mut removed = 0;
        let mut emptied = Vec::new();
        for (el, list) in self.table.iter_mut() {
            let before = list.len();
            list.retain(|r| r.window.end > now);
            if list.len() != before {
                removed += before - list.len();
                if list.is_empty() {
                    emptied.push(*el);
                }
            }
        }
        for el in emptied {
            self.table.remove(&el);
        }
        if removed > 0 {
            let table = &self.table;
            self.held.retain(|aircraft, set| {
                set.retain(|el| table.get(el).is_some_and(|l| l.iter().any(|r| r.aircraft == *aircraft)));
                !set.is_empty()
            });
        }
        removed
    }

    // ── Progress ──────────────────────────────────────────────────────────

    /// Record how far `aircraft` has travelled along `element` and at what
    /// speed.  No-op if it holds no reservation there.
    pub fn update_progress(&mut self, aircraft: AircraftId, element: Element, distance_m: f64, speed_mps: f64) {
        if let Some(list) = self.table.get_mut(&element) {
            for r in list.iter_mut().filter(|r| r.aircraft == aircraft) {
                r.distance_m = distance_m;
                r.speed_mps  = speed_mps;
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The holder of `element` at `tick`.  On a queued edge with several
    /// holders this is the one furthest along.
    pub fn query(&self, element: Element, tick: Tick) -> Option<AircraftId> {
        self.table
            .get(&element)?
            .iter()
            .filter(|r| r.window.contains(tick))
            .max_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then(b.aircraft.cmp(&a.aircraft)))
            .map(|r| r.aircraft)
    }

    /// Every holder of `element` at `tick`, ascending by id.
    pub fn holders(&self, element: Element, tick: Tick) -> Vec<AircraftId> {
        let mut v: Vec<AircraftId> = self
            .table
            .get(&element)
            .into_iter()
            .flatten()
            .filter(|r| r.window.contains(tick))
            .map(|r| r.aircraft)
            .collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    pub fn reservations(&self, element: Element) -> &[Reservation] {
        self.table.get(&element).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holds(&self, aircraft: AircraftId, element: Element) -> bool {
        self.held.get(&aircraft).is_some_and(|s| s.contains(&element))
    }

    /// Elements currently held by `aircraft`, ascending.
    pub fn held_by(&self, aircraft: AircraftId) -> impl Iterator<Item = Element> + '_ {
        self.held.get(&aircraft).into_iter().flatten().copied()
    }

    /// Every `(element, reservations)` pair with at least one reservation.
    pub fn iter(&self) -> impl Iterator<Item = (Element, &[Reservation])> + '_ {
        self.table.iter().map(|(el, list)| (*el, list.as_slice()))
    }

    /// Total number of reservations.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn holds_over(&self, aircraft: AircraftId, element: Element, window: &TimeWindow) -> bool {
        self.table
            .get(&element)
            .is_some_and(|l| l.iter().any(|r| r.aircraft == aircraft && r.window.overlaps(window)))
    }

    /// Ticks until `holder` is `min_separation_m` clear of the entry, at
    /// its current speed.  At least one.
    fn ticks_to_clear(&self, holder: &Reservation) -> u64 {
        let per_tick = holder.speed_mps * self.tick_duration_secs;
        if per_tick <= 0.0 || !per_tick.is_finite() {
            return 1;
        }
        let gap = self.min_separation_m - holder.distance_m;
        ((gap / per_tick).ceil() as u64).max(1)
    }
}
