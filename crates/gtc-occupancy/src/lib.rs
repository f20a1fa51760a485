//! `gtc-occupancy` — who holds which part of the airport, and who goes first.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`element`]  | `Element`, `Direction`, `Policy`, `Claim`, `Decision`     |
//! | [`manager`]  | `OccupancyManager`, `Reservation`                         |
//! | [`resolver`] | `ConflictResolver`, `ClaimRequest`, `Resolution`          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on elements and decisions. |

pub mod element;
pub mod manager;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use element::{Claim, Decision, Denial, DenyReason, Direction, Element, Policy};
pub use manager::{OccupancyManager, Reservation};
pub use resolver::{ClaimRequest, ConflictResolver, Resolution};
