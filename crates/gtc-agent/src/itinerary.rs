//! The node/edge sequence an aircraft is cleared along.

use gtc_core::{EdgeId, NodeId};
use gtc_graph::{AirportGraph, Route};

use crate::error::{AgentError, AgentResult};

/// A route as the agent consumes it: `nodes[i] → nodes[i + 1]` over
/// `edges[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Itinerary {
    pub nodes:        Vec<NodeId>,
    pub edges:        Vec<EdgeId>,
    /// Leading legs flown as an arrival rollout (braking, runway exit).
    /// Zero for departures.
    pub rollout_legs: usize,
}

impl Itinerary {
    pub fn from_route(route: &Route) -> Self {
        Itinerary {
            nodes:        route.nodes.clone(),
            edges:        route.edges.clone(),
            rollout_legs: 0,
        }
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn legs(&self) -> usize {
        self.edges.len()
    }

    /// Append `route`, which must start where this itinerary ends.
    pub fn extend(&mut self, route: &Route) -> AgentResult<()> {
        match (self.destination(), route.origin()) {
            (Some(end), Some(start)) if end == start => {
                self.nodes.extend_from_slice(&route.nodes[1..]);
                self.edges.extend_from_slice(&route.edges);
                Ok(())
            }
            (end, start) => Err(AgentError::InvalidRoute(format!(
                "cannot join route starting at {start:?} onto itinerary ending at {end:?}"
            ))),
        }
    }

    /// Check shape and connectivity against `graph`.
    pub fn validate(&self, graph: &AirportGraph) -> AgentResult<()> {
        if self.edges.is_empty() {
            return Err(AgentError::InvalidRoute("route has no edges".into()));
        }
        if self.nodes.len() != self.edges.len() + 1 {
            return Err(AgentError::InvalidRoute(format!(
                "{} nodes for {} edges",
                self.nodes.len(),
                self.edges.len()
            )));
        }
        if self.rollout_legs > self.edges.len() {
            return Err(AgentError::InvalidRoute("rollout longer than route".into()));
        }
        for (i, &e) in self.edges.iter().enumerate() {
            let (a, b) = (self.nodes[i], self.nodes[i + 1]);
            let ok = graph
                .get_edge(e)
                .is_some_and(|edge| edge.touches(a) && edge.other(a) == Some(b));
            if !ok {
                return Err(AgentError::InvalidRoute(format!("{e} does not join {a} to {b}")));
            }
        }
        Ok(())
    }
}
