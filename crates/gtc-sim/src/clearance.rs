//! Progressive taxi clearances.
//!
//! A route is cleared one chunk at a time, each chunk ending at the next
//! decision point: a hold-short node, a runway node, an intersection where
//! more than two edges meet, a switch between taxiway and runway, or the
//! destination.  Clearances are informational; motion is governed by
//! reservations alone.

use gtc_agent::Aircraft;
use gtc_core::{EdgeId, FlightKind, NodeId};
use gtc_graph::{AirportGraph, NodeKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clearance {
    /// Route index of the node the clearance ends at.
    pub until: usize,
    pub text:  String,
}

/// The clearance for `aircraft` starting at route index `from`, or `None`
/// if `from` is already the destination.
pub fn next_clearance(graph: &AirportGraph, aircraft: &Aircraft, from: usize) -> Option<Clearance> {
    let nodes = aircraft.route();
    let edges = aircraft.route_edges();
    let last = nodes.len().checked_sub(1)?;
    if from >= last {
        return None;
    }

    let rollout = aircraft.rollout_legs();
    let until = if from < rollout { rollout } else { chunk_end(graph, aircraft, from) };
    let target = graph.node(nodes[until]);
    let chunk = &edges[from..until];

    let text = if from < rollout {
        format!("Runway {}, exit at {}", runway_label(graph, edges[from]), target.name)
    } else if chunk.iter().all(|&e| graph.edge(e).runway) {
        let label = runway_label(graph, edges[from]);
        if until == last && aircraft.kind == FlightKind::Departure {
            format!("Runway {label}, line up and wait")
        } else {
            format!("Cross runway {label}")
        }
    } else {
        let via = via(graph, chunk);
        match target.kind {
            NodeKind::Gate if until == last => format!("Taxi to gate {}{via}", target.name),
            NodeKind::HoldShort => match edges.get(until).filter(|&&e| graph.edge(e).runway) {
                Some(&rwy) => format!(
                    "Taxi to {}{via}, hold short of runway {}",
                    target.name,
                    runway_label(graph, rwy)
                ),
                None => format!("Taxi to {}{via}, hold short", target.name),
            },
            NodeKind::RunwayThreshold => format!("Taxi to runway {}{via}", target.name),
            NodeKind::Intersection => format!("Taxi to intersection {}{via}", target.name),
            _ => format!("Taxi to {}{via}", target.name),
        }
    };
    Some(Clearance { until, text })
}

fn chunk_end(graph: &AirportGraph, aircraft: &Aircraft, from: usize) -> usize {
    let nodes = aircraft.route();
    let edges = aircraft.route_edges();
    let last = nodes.len() - 1;
    let runway = graph.edge(edges[from]).runway;
    let mut j = from + 1;
    while j < last {
        if graph.edge(edges[j]).runway != runway {
            break;
        }
        if !runway && is_decision_point(graph, nodes[j]) {
            break;
        }
        j += 1;
    }
    j
}

fn is_decision_point(graph: &AirportGraph, node: NodeId) -> bool {
    match graph.node(node).kind {
        NodeKind::HoldShort | NodeKind::RunwayThreshold | NodeKind::RunwayExit => true,
        NodeKind::Intersection => graph.degree(node) > 2,
        NodeKind::Gate | NodeKind::TaxiwayPoint => false,
    }
}

/// " via A B" from the taxiway names along `edges`, or empty.
fn via(graph: &AirportGraph, edges: &[EdgeId]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for name in edges.iter().filter_map(|&e| graph.edge(e).name.as_deref()) {
        if names.last() != Some(&name) {
            names.push(name);
        }
    }
    if names.is_empty() { String::new() } else { format!(" via {}", names.join(" ")) }
}

/// The runway's name, or its endpoints when it has none.
fn runway_label(graph: &AirportGraph, edge: EdgeId) -> String {
    let e = graph.edge(edge);
    match &e.name {
        Some(name) => name.clone(),
        None => format!("{}-{}", graph.node(e.from).name, graph.node(e.to).name),
    }
}
