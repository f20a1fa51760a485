use thiserror::Error;

use gtc_agent::AgentError;
use gtc_core::{AircraftId, CoreError, NodeId};
use gtc_graph::RoutingError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("tick duration must be positive and finite, got {0}")]
    InvalidTickDuration(f64),
}

pub type SimResult<T> = Result<T, SimError>;

/// Why a spawn request was refused.  None of these affect aircraft already
/// in the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    /// The spawn node (or, for arrivals, part of the rollout) is held.
    /// Transient: retry on a later tick.
    #[error("{node} is occupied by {holder}")]
    NodeBusy { node: NodeId, holder: AircraftId },

    #[error("{0} is not a valid spawn node for this flight")]
    NotASpawnNode(NodeId),

    #[error("{0} is not a runway threshold")]
    NotADestination(NodeId),

    #[error("no route from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("active aircraft limit of {0} reached")]
    CapacityReached(usize),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("runway {0} has no exit")]
    NoRunwayExit(NodeId),

    #[error("invalid route: {0}")]
    InvalidRoute(String),
}

impl From<RoutingError> for SpawnError {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::NoPath { from, to } => SpawnError::NoPath { from, to },
            RoutingError::UnknownNode(n) => SpawnError::UnknownNode(n),
        }
    }
}

impl From<AgentError> for SpawnError {
    fn from(e: AgentError) -> Self {
        match e {
            AgentError::InvalidRoute(msg) => SpawnError::InvalidRoute(msg),
            AgentError::NoRunwayExit(n) => SpawnError::NoRunwayExit(n),
        }
    }
}
