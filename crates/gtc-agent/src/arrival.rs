//! Runway-exit selection for arrivals.
//!
//! An exit is either a `runway-exit` node on the rollout itself, or a
//! `runway-exit` node one non-runway edge off a rollout node (a high-speed
//! turnoff).  Either way its distance is measured along the runway from the
//! threshold to where the aircraft leaves the runway line.

use gtc_core::{EdgeId, NodeId};
use gtc_graph::{AirportGraph, NodeKind, Rollout};

use crate::itinerary::Itinerary;
use crate::kinematics::EPS_M;

/// Where an arrival will leave the runway.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitChoice {
    pub exit:          NodeId,
    /// Index into the rollout of the last runway node passed.
    pub rollout_index: usize,
    /// Turnoff edge from that runway node to `exit`, if it is off the line.
    pub spur:          Option<EdgeId>,
    /// Along-runway distance from the threshold.
    pub distance_m:    f64,
}

impl ExitChoice {
    /// The runway part of an arrival's itinerary: threshold to exit.
    pub fn itinerary(&self, rollout: &Rollout) -> Itinerary {
        let i = self.rollout_index;
        let mut nodes = rollout.nodes[..=i].to_vec();
        let mut edges = rollout.edges[..i].to_vec();
        if let Some(spur) = self.spur {
            edges.push(spur);
            nodes.push(self.exit);
        }
        let rollout_legs = edges.len();
        Itinerary { nodes, edges, rollout_legs }
    }
}

/// Every exit reachable from `rollout`, in rollout order.
pub fn exit_candidates(graph: &AirportGraph, rollout: &Rollout) -> Vec<ExitChoice> {
    let mut out = Vec::new();
    for (i, &node) in rollout.nodes.iter().enumerate().skip(1) {
        let distance_m = rollout.distances_m[i];
        if graph.node(node).kind == NodeKind::RunwayExit {
            out.push(ExitChoice { exit: node, rollout_index: i, spur: None, distance_m });
        }
        for (edge, to) in graph.neighbors(node) {
            if graph.edge(edge).runway
                || graph.node(to).kind != NodeKind::RunwayExit
                || rollout.nodes.contains(&to)
            {
                continue;
            }
            out.push(ExitChoice { exit: to, rollout_index: i, spur: Some(edge), distance_m });
        }
    }
    out
}

/// The nearest exit at or beyond `stopping_m`; failing that, the farthest
/// exit.  Equal distances go to the lower declared `exit_priority` (exits
/// without one rank last), then the lower node id.
pub fn select_exit(graph: &AirportGraph, rollout: &Rollout, stopping_m: f64) -> Option<ExitChoice> {
    let candidates = exit_candidates(graph, rollout);
    let rank = |c: &ExitChoice| (graph.node(c.exit).exit_priority.unwrap_or(u32::MAX), c.exit);

    candidates
        .iter()
        .filter(|c| c.distance_m + EPS_M >= stopping_m)
        .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then_with(|| rank(a).cmp(&rank(b))))
        .or_else(|| {
            candidates
                .iter()
                .max_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then_with(|| rank(b).cmp(&rank(a))))
        })
        .copied()
}
