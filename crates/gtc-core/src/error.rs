//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface configuration failures.

use thiserror::Error;

use crate::{AircraftId, NodeId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("aircraft {0} not found")]
    AircraftNotFound(AircraftId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `gtc-core`.
pub type CoreResult<T> = Result<T, CoreError>;
