//! Path planning trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `gtc-sim` calls planning via the [`PathPlanner`] trait, so applications can
//! swap in other search strategies without touching the engine.
//!
//! # Cost and tie-breaks
//!
//! Edge weight is minimum transit time, `length / max_speed`, held as integral
//! **microseconds** so equal-cost comparisons are exact.  Between equal-cost
//! routes the planner prefers fewer turns, then the lexicographically lower
//! node-id sequence.  A turn is a heading change of more than
//! [`TURN_THRESHOLD_DEG`] where two consecutive edges meet.
//!
//! Because the turn count depends on the edge an aircraft arrived by, the
//! search runs over `(node, arriving edge)` states with lexicographic
//! `(cost, turns, node sequence)` labels.  All three components only grow
//! when a path is extended, so Dijkstra's settle-once argument still holds.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use gtc_core::geo::heading_delta;
use gtc_core::{EdgeId, NodeId};

use crate::graph::AirportGraph;
use crate::RoutingError;

/// Heading changes at or below this many degrees are not counted as turns.
pub const TURN_THRESHOLD_DEG: f64 = 15.0;

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Nodes in travel order, starting at the origin.
    pub nodes:   Vec<NodeId>,
    /// `edges[i]` joins `nodes[i]` and `nodes[i + 1]`.
    pub edges:   Vec<EdgeId>,
    /// Sum of edge transit times in microseconds.
    pub cost_us: u64,
    pub turns:   u32,
}

impl Route {
    pub fn total_secs(&self) -> f64 {
        self.cost_us as f64 / 1e6
    }

    /// `true` if origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable route search.
///
/// Implementations must be `Send + Sync` so a planner can be shared by the
/// simulation's worker threads.
pub trait PathPlanner: Send + Sync {
    /// Shortest route from `from` to `to` that uses none of `avoid`.
    fn plan_avoiding(
        &self,
        graph: &AirportGraph,
        from:  NodeId,
        to:    NodeId,
        avoid: &[EdgeId],
    ) -> Result<Route, RoutingError>;

    /// Shortest route from `from` to `to`.
    fn plan(&self, graph: &AirportGraph, from: NodeId, to: NodeId) -> Result<Route, RoutingError> {
        self.plan_avoiding(graph, from, to, &[])
    }
}

// ── DijkstraPlanner ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl PathPlanner for DijkstraPlanner {
    fn plan_avoiding(
        &self,
        graph: &AirportGraph,
        from:  NodeId,
        to:    NodeId,
        avoid: &[EdgeId],
    ) -> Result<Route, RoutingError> {
        dijkstra(graph, from, to, avoid)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry.  Field order is the comparison order.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Label {
    cost_us: u64,
    turns:   u32,
    nodes:   Vec<NodeId>,
    edges:   Vec<EdgeId>,
}

fn dijkstra(
    graph: &AirportGraph,
    from:  NodeId,
    to:    NodeId,
    avoid: &[EdgeId],
) -> Result<Route, RoutingError> {
    for n in [from, to] {
        if !graph.contains_node(n) {
            return Err(RoutingError::UnknownNode(n));
        }
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], cost_us: 0, turns: 0 });
    }

    // Settled (node, arriving edge) states; the origin arrives by INVALID.
    let mut settled: HashSet<(NodeId, EdgeId)> = HashSet::new();
    let mut heap: BinaryHeap<Reverse<Label>> = BinaryHeap::new();
    heap.push(Reverse(Label { cost_us: 0, turns: 0, nodes: vec![from], edges: vec![] }));

    while let Some(Reverse(label)) = heap.pop() {
        let Some(&node) = label.nodes.last() else { continue };
        let arrived_by = label.edges.last().copied().unwrap_or(EdgeId::INVALID);

        if !settled.insert((node, arrived_by)) {
            continue;
        }
        if node == to {
            return Ok(Route {
                nodes:   label.nodes,
                edges:   label.edges,
                cost_us: label.cost_us,
                turns:   label.turns,
            });
        }

        let inbound = label
            .nodes
            .len()
            .checked_sub(2)
            .map(|i| graph.edge_heading(arrived_by, label.nodes[i]));

        for (edge, next) in graph.neighbors(node) {
            if avoid.contains(&edge) || edge == arrived_by || label.nodes.contains(&next) {
                continue;
            }
            if settled.contains(&(next, edge)) {
                continue;
            }
            let outbound = graph.edge_heading(edge, node);
            let turned = inbound.is_some_and(|h| heading_delta(h, outbound).abs() > TURN_THRESHOLD_DEG);

            let mut nodes = label.nodes.clone();
            nodes.push(next);
            let mut edges = label.edges.clone();
            edges.push(edge);
            heap.push(Reverse(Label {
                cost_us: label.cost_us.saturating_add(graph.edge(edge).transit_us()),
                turns:   label.turns + u32::from(turned),
                nodes,
                edges,
            }));
        }
    }

    Err(RoutingError::NoPath { from, to })
}
