//! Aircraft lifecycle states.

use std::fmt;

/// Where an aircraft is in its life on the ground.
///
/// Departures: `Spawned → Taxiing ⇄ HoldingShort → (Departing | Crossing) →
/// Taxiing → … → Despawned`.  Arrivals: `Spawned → Decelerating →
/// ExitingRunway → Taxiing → Exiting → Despawned`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleState {
    /// Created, holding its spawn node, first edge not yet entered.
    #[default]
    Spawned,
    Taxiing,
    /// Stopped at the end of an edge because the next exclusive element
    /// was refused.
    HoldingShort,
    /// On the runway edges that end the departure route.
    Departing,
    /// On a runway edge with taxiway still to follow.
    Crossing,
    /// On the final leg of the route.
    Exiting,
    /// Arrival braking from touchdown speed.
    Decelerating,
    /// Arrival at taxi speed, still on its runway rollout.
    ExitingRunway,
    Despawned,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Spawned       => "spawned",
            LifecycleState::Taxiing       => "taxiing",
            LifecycleState::HoldingShort  => "holding-short",
            LifecycleState::Departing     => "departing",
            LifecycleState::Crossing      => "crossing",
            LifecycleState::Exiting       => "exiting",
            LifecycleState::Decelerating  => "decelerating",
            LifecycleState::ExitingRunway => "exiting-runway",
            LifecycleState::Despawned     => "despawned",
        }
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self != LifecycleState::Despawned
    }

    /// Occupying a runway edge.
    #[inline]
    pub fn is_on_runway(self) -> bool {
        matches!(
            self,
            LifecycleState::Departing
                | LifecycleState::Crossing
                | LifecycleState::Decelerating
                | LifecycleState::ExitingRunway
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
