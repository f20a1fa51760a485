//! The event feed: per-tick aircraft snapshots, discrete events and tick
//! summaries.  This is the only view of the simulation that output writers
//! and renderers get.

use std::fmt;

use gtc_agent::LifecycleState;
use gtc_core::{AircraftId, EdgeId, FlightKind, NodeId, Point, Tick};
use gtc_occupancy::Element;

/// One aircraft at the end of one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AircraftSnapshot {
    pub tick:         Tick,
    pub id:           AircraftId,
    pub kind:         FlightKind,
    pub emergency:    bool,
    pub state:        LifecycleState,
    pub position:     Point,
    pub heading_deg:  f64,
    pub velocity_mps: f64,
    pub edge:         EdgeId,
    /// Fraction of `edge` covered, in `[0, 1]`.
    pub progress:     f64,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DespawnReason {
    /// Reached its destination node.
    Arrived,
    /// Removed after a stuck fault.
    Stuck,
}

impl DespawnReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DespawnReason::Arrived => "arrived",
            DespawnReason::Stuck   => "stuck",
        }
    }
}

/// Something worth reporting that a snapshot does not show.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimEvent {
    Spawned {
        tick:        Tick,
        aircraft:    AircraftId,
        kind:        FlightKind,
        emergency:   bool,
        node:        NodeId,
        destination: NodeId,
    },
    /// A spawn request the generator made was refused.
    SpawnRejected {
        tick:   Tick,
        kind:   FlightKind,
        node:   NodeId,
        reason: String,
    },
    /// A taxi clearance up to the next decision point.
    Clearance {
        tick:     Tick,
        aircraft: AircraftId,
        until:    NodeId,
        text:     String,
    },
    /// Access granted to exclusive elements (runway, hold-short, intersection).
    Granted {
        tick:     Tick,
        aircraft: AircraftId,
        elements: Vec<Element>,
    },
    HoldingShort {
        tick:     Tick,
        aircraft: AircraftId,
        element:  Element,
        blocker:  AircraftId,
    },
    Replanned {
        tick:       Tick,
        aircraft:   AircraftId,
        avoided:    EdgeId,
        /// Nodes still to travel after the edge the aircraft is on.
        route_tail: Vec<NodeId>,
    },
    StuckFault {
        tick:       Tick,
        aircraft:   AircraftId,
        idle_ticks: u64,
        edge:       EdgeId,
    },
    Despawned {
        tick:     Tick,
        aircraft: AircraftId,
        reason:   DespawnReason,
    },
}

impl SimEvent {
    pub fn tick(&self) -> Tick {
        match *self {
            SimEvent::Spawned { tick, .. }
            | SimEvent::SpawnRejected { tick, .. }
            | SimEvent::Clearance { tick, .. }
            | SimEvent::Granted { tick, .. }
            | SimEvent::HoldingShort { tick, .. }
            | SimEvent::Replanned { tick, .. }
            | SimEvent::StuckFault { tick, .. }
            | SimEvent::Despawned { tick, .. } => tick,
        }
    }

    /// The aircraft concerned, if any.
    pub fn aircraft(&self) -> Option<AircraftId> {
        match *self {
            SimEvent::SpawnRejected { .. } => None,
            SimEvent::Spawned { aircraft, .. }
            | SimEvent::Clearance { aircraft, .. }
            | SimEvent::Granted { aircraft, .. }
            | SimEvent::HoldingShort { aircraft, .. }
            | SimEvent::Replanned { aircraft, .. }
            | SimEvent::StuckFault { aircraft, .. }
            | SimEvent::Despawned { aircraft, .. } => Some(aircraft),
        }
    }

    /// Short machine-friendly name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::Spawned { .. }       => "spawned",
            SimEvent::SpawnRejected { .. } => "spawn-rejected",
            SimEvent::Clearance { .. }     => "clearance",
            SimEvent::Granted { .. }       => "granted",
            SimEvent::HoldingShort { .. }  => "holding-short",
            SimEvent::Replanned { .. }     => "replanned",
            SimEvent::StuckFault { .. }    => "stuck-fault",
            SimEvent::Despawned { .. }     => "despawned",
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Spawned { aircraft, kind, node, destination, emergency, .. } => {
                let tag = if *emergency { " (emergency)" } else { "" };
                write!(f, "{aircraft} {kind}{tag} spawned at {node} for {destination}")
            }
            SimEvent::SpawnRejected { kind, node, reason, .. } => {
                write!(f, "{kind} at {node} rejected: {reason}")
            }
            SimEvent::Clearance { aircraft, text, .. } => write!(f, "{aircraft}: {text}"),
            SimEvent::Granted { aircraft, elements, .. } => {
                write!(f, "{aircraft} granted")?;
                for el in elements {
                    write!(f, " {el}")?;
                }
                Ok(())
            }
            SimEvent::HoldingShort { aircraft, element, blocker, .. } => {
                write!(f, "{aircraft} holding short of {element} for {blocker}")
            }
            SimEvent::Replanned { aircraft, avoided, route_tail, .. } => {
                write!(f, "{aircraft} rerouted around {avoided} ({} nodes to go)", route_tail.len())
            }
            SimEvent::StuckFault { aircraft, idle_ticks, edge, .. } => {
                write!(f, "{aircraft} stuck on {edge} for {idle_ticks} ticks")
            }
            SimEvent::Despawned { aircraft, reason, .. } => {
                write!(f, "{aircraft} despawned ({})", reason.as_str())
            }
        }
    }
}

/// Counters for one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSummary {
    pub tick:         Tick,
    /// Aircraft still active after the tick.
    pub active:       usize,
    /// Aircraft spawned since the previous tick.
    pub spawned:      usize,
    pub despawned:    usize,
    /// Aircraft in `HoldingShort` after the tick.
    pub holding:      usize,
    pub grants:       usize,
    pub denials:      usize,
    /// Elements requested by more than one aircraft this tick.
    pub contested:    usize,
    pub stuck_faults: usize,
    pub replans:      usize,
}

/// Running totals since the simulation was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimStats {
    pub spawned:      u64,
    pub arrived:      u64,
    pub stuck_faults: u64,
    pub replans:      u64,
    pub rejected:     u64,
    pub grants:       u64,
    pub denials:      u64,
}
