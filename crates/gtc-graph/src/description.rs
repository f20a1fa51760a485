//! The validated input contract for [`AirportGraph::load`][crate::AirportGraph::load].
//!
//! A `GraphDescription` is what an ingestion layer hands to the core: named
//! nodes with local coordinates and type tags, and edges between them.  Edge
//! endpoints may be given by node name or by coordinate; coordinates are
//! snapped to the nearest node at load time.
//!
//! # Example
//!
//! ```
//! use gtc_graph::{AirportGraph, EdgeSpec, GraphDescription, NodeKind};
//!
//! let mut d = GraphDescription::new();
//! d.node("A", NodeKind::Gate, 0.0, 0.0)
//!  .node("B", NodeKind::Intersection, 0.0, 100.0)
//!  .node("C", NodeKind::RunwayThreshold, 0.0, 300.0)
//!  .edge(EdgeSpec::between("A", "B", 10.0).named("A"))
//!  .edge(EdgeSpec::between("B", "C", 10.0).runway().named("05"));
//! let graph = AirportGraph::load(&d).unwrap();
//! assert_eq!(graph.node_count(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::GraphError;

/// Default radius within which a coordinate endpoint snaps to a node.
pub const DEFAULT_SNAP_TOLERANCE_M: f64 = 5.0;

// ── NodeKind ──────────────────────────────────────────────────────────────────

/// Type tag of an airport-graph node.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NodeKind {
    Gate,
    RunwayThreshold,
    RunwayExit,
    Intersection,
    HoldShort,
    TaxiwayPoint,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Gate,
        NodeKind::RunwayThreshold,
        NodeKind::RunwayExit,
        NodeKind::Intersection,
        NodeKind::HoldShort,
        NodeKind::TaxiwayPoint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Gate            => "gate",
            NodeKind::RunwayThreshold => "runway-threshold",
            NodeKind::RunwayExit      => "runway-exit",
            NodeKind::Intersection    => "intersection",
            NodeKind::HoldShort       => "hold-short",
            NodeKind::TaxiwayPoint    => "taxiway-point",
        }
    }

    /// Whether at most one aircraft may hold this node at a time.
    ///
    /// Plain taxiway points are pass-through markers and allow queued use;
    /// every other node is a place where two aircraft would physically meet.
    #[inline]
    pub fn is_exclusive(self) -> bool {
        !matches!(self, NodeKind::TaxiwayPoint)
    }

    /// Gates and runway thresholds are where aircraft enter the simulation.
    #[inline]
    pub fn is_spawn(self) -> bool {
        matches!(self, NodeKind::Gate | NodeKind::RunwayThreshold)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| GraphError::Malformed(format!("unknown node kind '{s}'")))
    }
}

// ── NodeSpec ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    /// Unique human-readable name ("G3", "HS-05", "A/B").
    pub name: String,
    pub kind: NodeKind,
    pub x:    f64,
    pub y:    f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z:    f64,
    /// Declared exit preference; lower wins ties between equally near
    /// runway exits.  Undeclared exits rank after declared ones.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exit_priority: Option<u32>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, kind: NodeKind, x: f64, y: f64) -> Self {
        Self { name: name.into(), kind, x, y, z: 0.0, exit_priority: None }
    }

    pub fn with_exit_priority(mut self, priority: u32) -> Self {
        self.exit_priority = Some(priority);
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
}

// ── EdgeSpec ──────────────────────────────────────────────────────────────────

/// One end of an edge: a node name, or a coordinate to snap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum EdgeEndpoint {
    Node(String),
    Point { x: f64, y: f64 },
}

impl From<&str> for EdgeEndpoint {
    fn from(name: &str) -> Self {
        EdgeEndpoint::Node(name.to_owned())
    }
}

impl From<String> for EdgeEndpoint {
    fn from(name: String) -> Self {
        EdgeEndpoint::Node(name)
    }
}

impl From<(f64, f64)> for EdgeEndpoint {
    fn from((x, y): (f64, f64)) -> Self {
        EdgeEndpoint::Point { x, y }
    }
}

impl fmt::Display for EdgeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeEndpoint::Node(name)     => write!(f, "'{name}'"),
            EdgeEndpoint::Point { x, y } => write!(f, "@({x}, {y})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSpec {
    pub from: EdgeEndpoint,
    pub to:   EdgeEndpoint,
    /// Physical length; the Euclidean distance between endpoints when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub length_m: Option<f64>,
    pub max_speed_mps: f64,
    /// One-way from `from` to `to`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub directional: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub runway: bool,
    /// Taxiway or runway designator used in clearances ("A", "B2", "05").
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
}

impl EdgeSpec {
    /// A bidirectional taxiway edge with the length taken from geometry.
    pub fn between(
        from: impl Into<EdgeEndpoint>,
        to: impl Into<EdgeEndpoint>,
        max_speed_mps: f64,
    ) -> Self {
        Self {
            from:          from.into(),
            to:            to.into(),
            length_m:      None,
            max_speed_mps,
            directional:   false,
            runway:        false,
            name:          None,
        }
    }

    pub fn length(mut self, length_m: f64) -> Self {
        self.length_m = Some(length_m);
        self
    }

    pub fn directional(mut self) -> Self {
        self.directional = true;
        self
    }

    pub fn runway(mut self) -> Self {
        self.runway = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ── GraphDescription ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphDescription {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    #[cfg_attr(feature = "serde", serde(default = "default_snap_tolerance"))]
    pub snap_tolerance_m: f64,
}

#[cfg(feature = "serde")]
fn default_snap_tolerance() -> f64 {
    DEFAULT_SNAP_TOLERANCE_M
}

impl GraphDescription {
    pub fn new() -> Self {
        Self {
            nodes:            Vec::new(),
            edges:            Vec::new(),
            snap_tolerance_m: DEFAULT_SNAP_TOLERANCE_M,
        }
    }

    /// Append a node with `z = 0` and no exit priority.
    pub fn node(&mut self, name: impl Into<String>, kind: NodeKind, x: f64, y: f64) -> &mut Self {
        self.nodes.push(NodeSpec::new(name, kind, x, y));
        self
    }

    pub fn node_spec(&mut self, spec: NodeSpec) -> &mut Self {
        self.nodes.push(spec);
        self
    }

    pub fn edge(&mut self, spec: EdgeSpec) -> &mut Self {
        self.edges.push(spec);
        self
    }

    pub fn snap_tolerance(&mut self, metres: f64) -> &mut Self {
        self.snap_tolerance_m = metres;
        self
    }
}

impl Default for GraphDescription {
    fn default() -> Self {
        Self::new()
    }
}
