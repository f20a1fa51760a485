use thiserror::Error;

use gtc_core::NodeId;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    #[error("runway threshold {0} has no reachable runway exit")]
    NoRunwayExit(NodeId),
}

pub type AgentResult<T> = Result<T, AgentError>;
