//! `gtc-sim` — the simulation clock for the ground traffic control
//! simulator.
//!
//! # Tick loop
//!
//! ```text
//! each tick:
//!   ① Propose   — every active aircraft computes its motion budget, the
//!                 leader-limited advance and the claims it needs to pass
//!                 the end of its edge (parallel with the `parallel`
//!                 feature; reads only the start-of-tick snapshot).
//!   ② Commit    — ConflictResolver orders the tick's claims by
//!                 (priority class, spawn tick, id) and commits them to the
//!                 OccupancyManager all-or-nothing per aircraft.
//!   ③ Integrate — in ascending AircraftId order:
//!                   apply the decision, release passed elements,
//!                   report progress, emit hold-short / clearance events,
//!                   replan after persistent denials,
//!                   despawn on arrival or stuck timeout.
//! ```
//!
//! Spawns happen between ticks through the spawn API or a
//! [`TrafficGenerator`]; they take effect on the next tick.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`sim`]       | `Simulation`, `SimulationState`                       |
//! | [`builder`]   | `SimBuilder`                                          |
//! | [`spawn`]     | `SpawnRequest`, `spawn_departure`, `spawn_arrival`, … |
//! | [`generator`] | `TrafficGenerator`                                    |
//! | [`clearance`] | progressive taxi clearances                           |
//! | [`feed`]      | `AircraftSnapshot`, `SimEvent`, `TickSummary`         |
//! | [`observer`]  | `TrafficObserver`, `NoopObserver`                     |
//! | [`error`]     | `SimError`, `SpawnError`                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the propose phase on Rayon's thread pool.          |
//! | `fx-hash`  | FxHash for the per-tick edge traffic index.             |
//! | `serde`    | `Serialize`/`Deserialize` on the feed types.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gtc_core::TrafficConfig;
//! use gtc_graph::{AirportGraph, DijkstraPlanner};
//! use gtc_sim::{NoopObserver, SimBuilder, TrafficGenerator};
//!
//! let graph = AirportGraph::load(&description)?;
//! let config = TrafficConfig::default();
//! let mut traffic = TrafficGenerator::from_config(&config);
//! let mut sim = SimBuilder::new(graph, config, DijkstraPlanner).build()?;
//! sim.run_with_traffic(3_600, &mut traffic, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod clearance;
pub mod error;
pub mod feed;
pub mod generator;
pub mod observer;
pub mod sim;
pub mod spawn;

mod index;


pub use builder::SimBuilder;
pub use clearance::{Clearance, next_clearance};
pub use error::{SimError, SimResult, SpawnError};
pub use feed::{AircraftSnapshot, DespawnReason, SimEvent, SimStats, TickSummary};
pub use generator::TrafficGenerator;
pub use observer::{NoopObserver, TrafficObserver};
pub use sim::{Simulation, SimulationState};
pub use spawn::SpawnRequest;
