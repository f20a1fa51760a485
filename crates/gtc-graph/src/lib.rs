//! `gtc-graph` — airport surface graph, loading, and path planning.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`description`] | `GraphDescription`, `NodeSpec`, `EdgeSpec`, `NodeKind`  |
//! | [`graph`]       | `AirportGraph` (arena + CSR + R-tree), `Rollout`        |
//! | [`validate`]    | load-time reachability checks                           |
//! | [`loader`]      | `load_graph_csv`, `load_graph_readers`                  |
//! | [`planner`]     | `PathPlanner` trait, `Route`, `DijkstraPlanner`         |
//! | [`error`]       | `GraphError`, `RoutingError`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the description types.  |

pub mod description;
pub mod error;
pub mod graph;
pub mod loader;
pub mod planner;
pub mod validate;

#[cfg(test)]
mod tests;

pub use description::{EdgeEndpoint, EdgeSpec, GraphDescription, NodeKind, NodeSpec};
pub use error::{GraphError, GraphResult, RoutingError};
pub use graph::{AirportGraph, Edge, Node, Rollout};
pub use loader::{load_graph_csv, load_graph_readers, read_description};
pub use planner::{DijkstraPlanner, PathPlanner, Route};
