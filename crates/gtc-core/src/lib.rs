//! `gtc-core` — foundational types for the ground traffic control simulator.
//!
//! This crate is a dependency of every other `gtc-*` crate.  It intentionally
//! has no `gtc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AircraftId`, `NodeId`, `EdgeId`                      |
//! | [`geo`]         | `Point`, headings and heading blending                |
//! | [`time`]        | `Tick`, `SimClock`, `TimeWindow`                      |
//! | [`config`]      | `TrafficConfig`                                       |
//! | [`rng`]         | `AircraftRng` (per-aircraft), `SimRng` (global)       |
//! | [`traffic`]     | `FlightKind`, `PriorityClass`                         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod traffic;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::TrafficConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AircraftId, EdgeId, NodeId};
pub use rng::{AircraftRng, SimRng};
pub use time::{SimClock, Tick, TimeWindow};
pub use traffic::{FlightKind, PriorityClass};
