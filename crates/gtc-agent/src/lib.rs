//! `gtc-agent` — the per-aircraft state machine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`state`]       | `LifecycleState`                                       |
//! | [`aircraft`]    | `Aircraft`, `AircraftInit`                             |
//! | [`itinerary`]   | `Itinerary`, the route as consumed by an aircraft      |
//! | [`motion`]      | `propose`/`apply`, `Proposal`, `StepOutcome`, `TrafficView` |
//! | [`kinematics`]  | braking integration, stopping distance, heading blend  |
//! | [`arrival`]     | runway-exit selection                                  |
//! | [`error`]       | `AgentError`, `AgentResult`                            |
//!
//! # Tick contract
//!
//! ```text
//! propose(&self, graph, limits, &snapshot) -> Proposal      // parallel-safe
//!     ↓ claims committed by the simulation's resolver
//! apply(&mut self, graph, limits, &proposal, decision) -> StepOutcome
//!     ↓ outcome.release handed back to the occupancy manager
//! ```
//!
//! # Feature flags
//!
//! | Flag    | Effect                                          |
//! |---------|-------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `LifecycleState`. |

pub mod aircraft;
pub mod arrival;
pub mod error;
pub mod itinerary;
pub mod kinematics;
pub mod motion;
pub mod state;


pub use aircraft::{Aircraft, AircraftInit};
pub use arrival::{ExitChoice, exit_candidates, select_exit};
pub use error::{AgentError, AgentResult};
pub use itinerary::Itinerary;
pub use kinematics::{blended_heading, decelerate, stopping_distance};
pub use motion::{EmptyTraffic, MotionLimits, Proposal, StepOutcome, TrafficView, is_exclusive_element};
pub use state::LifecycleState;
