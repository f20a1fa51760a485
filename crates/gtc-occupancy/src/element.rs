//! Reservable graph elements and their sharing policies.

use std::fmt;

use gtc_core::{AircraftId, EdgeId, NodeId, Tick};

/// A node or an edge of the airport graph.  Nodes sort before edges.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Node(n) => write!(f, "{n}"),
            Element::Edge(e) => write!(f, "{e}"),
        }
    }
}

/// Travel direction on an edge relative to its declared `from → to`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_forward(forward: bool) -> Self {
        if forward { Direction::Forward } else { Direction::Reverse }
    }
}

/// How an element may be shared.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    /// One holder at a time.
    Exclusive,
    /// Several same-direction holders, spaced by the minimum separation.
    Queued,
}

/// One element an aircraft asks for, with its direction of travel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Claim {
    pub element:   Element,
    pub direction: Direction,
}

impl Claim {
    pub fn node(node: NodeId) -> Self {
        Claim { element: Element::Node(node), direction: Direction::Forward }
    }

    pub fn edge(edge: EdgeId, direction: Direction) -> Self {
        Claim { element: Element::Edge(edge), direction }
    }
}

// ── Decisions ─────────────────────────────────────────────────────────────────

/// Why a request was refused.  Denials are control flow, not errors: the
/// caller keeps its current position and asks again on a later tick.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DenyReason {
    /// An exclusive element is held by someone else.
    Held { holder: AircraftId },
    /// A queued edge is occupied too close to its entry.
    Separation { holder: AircraftId, retry_at: Tick },
    /// A queued edge is occupied by traffic in the opposite direction.
    HeadOn { holder: AircraftId },
    /// Another request in the same tick's batch had right of way.
    LostTieBreak { winner: AircraftId },
}

impl DenyReason {
    /// The aircraft standing in the way.
    pub fn blocker(&self) -> AircraftId {
        match *self {
            DenyReason::Held { holder }
            | DenyReason::Separation { holder, .. }
            | DenyReason::HeadOn { holder } => holder,
            DenyReason::LostTieBreak { winner } => winner,
        }
    }

    /// Recommended tick for the next attempt, when one can be computed.
    pub fn retry_at(&self) -> Option<Tick> {
        match *self {
            DenyReason::Separation { retry_at, .. } => Some(retry_at),
            _ => None,
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::Held { holder } => write!(f, "held by {holder}"),
            DenyReason::Separation { holder, retry_at } => {
                write!(f, "too close behind {holder}, retry at {retry_at}")
            }
            DenyReason::HeadOn { holder } => write!(f, "opposite traffic {holder}"),
            DenyReason::LostTieBreak { winner } => write!(f, "gave way to {winner}"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Denial {
    pub element: Element,
    pub reason:  DenyReason,
}

#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decision {
    Granted,
    Denied(Denial),
}

impl Decision {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted)
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Granted   => None,
            Decision::Denied(d) => Some(d),
        }
    }
}
