//! Flat row types written by the output backends.

use gtc_core::Tick;
use gtc_sim::{AircraftSnapshot, SimEvent, TickSummary};

/// One aircraft at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotRow {
    pub tick:         u64,
    pub elapsed_secs: f64,
    pub aircraft_id:  u32,
    pub kind:         &'static str,
    pub emergency:    bool,
    pub state:        &'static str,
    pub x:            f64,
    pub y:            f64,
    pub heading_deg:  f64,
    pub velocity_mps: f64,
    pub edge_id:      u32,
    /// Fraction of the current edge travelled, in [0, 1].
    pub progress:     f64,
}

impl SnapshotRow {
    pub fn new(snap: &AircraftSnapshot, tick_duration_secs: f64) -> Self {
        Self {
            tick:         snap.tick.0,
            elapsed_secs: snap.tick.0 as f64 * tick_duration_secs,
            aircraft_id:  snap.id.0,
            kind:         snap.kind.as_str(),
            emergency:    snap.emergency,
            state:        snap.state.as_str(),
            x:            snap.position.x,
            y:            snap.position.y,
            heading_deg:  snap.heading_deg,
            velocity_mps: snap.velocity_mps,
            edge_id:      snap.edge.0,
            progress:     snap.progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_secs: f64,
    pub active:       u64,
    pub spawned:      u64,
    pub despawned:    u64,
    pub holding:      u64,
    pub grants:       u64,
    pub denials:      u64,
    pub contested:    u64,
    pub stuck_faults: u64,
    pub replans:      u64,
}

impl TickSummaryRow {
    pub fn new(summary: &TickSummary, tick_duration_secs: f64) -> Self {
        Self {
            tick:         summary.tick.0,
            elapsed_secs: summary.tick.0 as f64 * tick_duration_secs,
            active:       summary.active as u64,
            spawned:      summary.spawned as u64,
            despawned:    summary.despawned as u64,
            holding:      summary.holding as u64,
            grants:       summary.grants as u64,
            denials:      summary.denials as u64,
            contested:    summary.contested as u64,
            stuck_faults: summary.stuck_faults as u64,
            replans:      summary.replans as u64,
        }
    }
}

/// One entry of the event feed.  `detail` is the event's display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:        u64,
    /// `None` for events that concern no single aircraft.
    pub aircraft_id: Option<u32>,
    pub kind:        &'static str,
    pub detail:      String,
}

impl From<&SimEvent> for EventRow {
    fn from(event: &SimEvent) -> Self {
        let Tick(tick) = event.tick();
        Self {
            tick,
            aircraft_id: event.aircraft().map(|a| a.0),
            kind:        event.kind(),
            detail:      event.to_string(),
        }
    }
}
