//! Load-time reachability checks.
//!
//! A graph is accepted only if
//!
//! 1. every node is reachable from at least one spawn node (gate or runway
//!    threshold),
//! 2. every runway threshold is reachable from every gate, and
//! 3. every gate is reachable from every runway threshold.
//!
//! Reachability respects one-way edges.

use std::collections::VecDeque;

use gtc_core::NodeId;

use crate::description::NodeKind;
use crate::graph::AirportGraph;
use crate::{GraphError, GraphResult};

/// Breadth-first reachability from every node in `sources`.
pub fn reachable_from(graph: &AirportGraph, sources: &[NodeId]) -> Vec<bool> {
    let mut seen  = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    for &s in sources {
        if let Some(flag) = seen.get_mut(s.index()) {
            if !*flag {
                *flag = true;
                queue.push_back(s);
            }
        }
    }
    while let Some(n) = queue.pop_front() {
        for (_, to) in graph.neighbors(n) {
            if !seen[to.index()] {
                seen[to.index()] = true;
                queue.push_back(to);
            }
        }
    }
    seen
}

pub(crate) fn check_reachability(graph: &AirportGraph) -> GraphResult<()> {
    let gates      = graph.nodes_of_kind(NodeKind::Gate);
    let thresholds = graph.nodes_of_kind(NodeKind::RunwayThreshold);

    let from_spawn = reachable_from(graph, &graph.spawn_nodes());
    let orphans: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|n| !from_spawn[n.id.index()])
        .map(|n| n.name.as_str())
        .collect();
    if !orphans.is_empty() {
        return Err(GraphError::Disconnected(format!(
            "unreachable from any spawn node: {}",
            orphans.join(", ")
        )));
    }

    check_all_reach(graph, &gates, &thresholds)?;
    check_all_reach(graph, &thresholds, &gates)?;
    Ok(())
}

fn check_all_reach(graph: &AirportGraph, sources: &[NodeId], targets: &[NodeId]) -> GraphResult<()> {
    for &s in sources {
        let seen = reachable_from(graph, &[s]);
        if let Some(&t) = targets.iter().find(|t| !seen[t.index()]) {
            return Err(GraphError::Disconnected(format!(
                "{} '{}' cannot reach {} '{}'",
                graph.node(s).kind,
                graph.node(s).name,
                graph.node(t).kind,
                graph.node(t).name,
            )));
        }
    }
    Ok(())
}
