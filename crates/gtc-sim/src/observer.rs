//! Observer hooks for progress reporting and data collection.

use gtc_core::Tick;

use crate::feed::{AircraftSnapshot, SimEvent, TickSummary};

/// Callbacks invoked by [`Simulation::run_ticks`][crate::Simulation::run_ticks]
/// and friends.
///
/// Every method has a no-op default, so implementors only override what
/// they need.
///
/// # Example: hold-short counter
///
/// ```rust,ignore
/// struct Holds(usize);
///
/// impl TrafficObserver for Holds {
///     fn on_event(&mut self, event: &SimEvent) {
///         if matches!(event, SimEvent::HoldingShort { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait TrafficObserver {
    /// Before any processing of `tick`.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Every `output_interval_ticks` ticks, with every aircraft that was
    /// active during the tick (those that despawned show `Despawned`).
    fn on_snapshot(&mut self, _tick: Tick, _snapshots: &[AircraftSnapshot]) {}

    /// Once per event, in the order they happened.
    fn on_event(&mut self, _event: &SimEvent) {}

    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// After the last tick of a run.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`TrafficObserver`] that ignores everything.
pub struct NoopObserver;

impl TrafficObserver for NoopObserver {}
