//! Graph and routing error types.

use thiserror::Error;

use gtc_core::NodeId;

/// Load-time failures.  Fatal: a simulation cannot start without a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed graph description: {0}")]
    Malformed(String),

    #[error("disconnected graph: {0}")]
    Disconnected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Planner failures.  Local to one request; never fatal to the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} is not part of the graph")]
    UnknownNode(NodeId),
}
