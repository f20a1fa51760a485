//! Strongly typed, zero-cost identifier wrappers.
//!
//! Nodes and edges live in flat arenas inside the airport graph; every
//! cross-reference (edge endpoints, routes, reservations) is one of these
//! indices, never a borrowed reference.  All IDs are `Copy + Ord + Hash` so
//! they can be used as map keys and sorted collection elements without
//! ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" (`u32::MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifier of a simulated aircraft, assigned sequentially at spawn.
    pub struct AircraftId(u32);
}

typed_id! {
    /// Index of an airport-graph node (gate, hold-short, runway point, …).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a physical airport-graph edge.  A bidirectional taxiway
    /// segment is one edge traversable in both directions.
    pub struct EdgeId(u32);
}
