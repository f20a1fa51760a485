//! Flight classification shared by the agent, resolver and output layers.

use std::fmt;

/// Whether an aircraft is leaving from a gate or landing on a runway.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightKind {
    Departure,
    Arrival,
}

impl FlightKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightKind::Departure => "departure",
            FlightKind::Arrival   => "arrival",
        }
    }
}

impl fmt::Display for FlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-of-way class used by conflict resolution.
///
/// Declared in precedence order, so the derived `Ord` sorts the class that
/// wins a contested element first.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorityClass {
    Emergency,
    Arrival,
    Departure,
}

impl PriorityClass {
    pub fn of(kind: FlightKind, emergency: bool) -> Self {
        match (emergency, kind) {
            (true, _)                     => PriorityClass::Emergency,
            (false, FlightKind::Arrival)  => PriorityClass::Arrival,
            (false, FlightKind::Departure) => PriorityClass::Departure,
        }
    }
}
