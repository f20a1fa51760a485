//! The airport surface graph.
//!
//! # Data layout
//!
//! Nodes and edges live in flat arenas indexed by `NodeId` / `EdgeId` in
//! declaration order.  A bidirectional taxiway segment is **one** physical
//! edge, so a reservation on it covers traffic in both directions.
//!
//! Traversal uses a CSR table of *links*: for node `n`, the slice
//!
//! ```text
//! links[ link_start[n] .. link_start[n+1] ]
//! ```
//!
//! holds every `(edge, far node)` pair an aircraft standing on `n` may take,
//! sorted by far-node id then edge id so every consumer iterates in the same
//! deterministic order.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps local `[x, y]` coordinates to the nearest
//! `NodeId`.  Used at load time to snap coordinate endpoints, and by callers
//! that need to place a position on the graph.

use std::collections::HashMap;

use log::info;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use gtc_core::{EdgeId, NodeId, Point};

use crate::description::{EdgeEndpoint, GraphDescription, NodeKind};
use crate::validate;
use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Node / Edge ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Node {
    pub id:            NodeId,
    pub name:          String,
    pub kind:          NodeKind,
    pub pos:           Point,
    pub exit_priority: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub id:            EdgeId,
    pub from:          NodeId,
    pub to:            NodeId,
    pub length_m:      f64,
    pub max_speed_mps: f64,
    pub directional:   bool,
    pub runway:        bool,
    pub name:          Option<String>,
}

impl Edge {
    /// Minimum transit time in integral microseconds.
    #[inline]
    pub fn transit_us(&self) -> u64 {
        (self.length_m / self.max_speed_mps * 1e6).round() as u64
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    #[inline]
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.from {
            Some(self.to)
        } else if node == self.to {
            Some(self.from)
        } else {
            None
        }
    }

    /// `true` if an aircraft entering at `node` travels in the declared
    /// `from → to` orientation.
    #[inline]
    pub fn is_forward_from(&self, node: NodeId) -> bool {
        node == self.from
    }

    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        node == self.from || node == self.to
    }
}

// ── Rollout ───────────────────────────────────────────────────────────────────

/// The straight run of runway edges an arrival follows from its threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rollout {
    /// `nodes[0]` is the threshold.
    pub nodes:       Vec<NodeId>,
    pub edges:       Vec<EdgeId>,
    /// Distance from the threshold to `nodes[i]`, in metres.
    pub distances_m: Vec<f64>,
}

impl Rollout {
    pub fn total_length_m(&self) -> f64 {
        self.distances_m.last().copied().unwrap_or(0.0)
    }
}

// ── AirportGraph ──────────────────────────────────────────────────────────────

/// Immutable-after-load airport graph.  Safe to share by reference across
/// threads; nothing in it is interior-mutable.
pub struct AirportGraph {
    nodes:       Vec<Node>,
    edges:       Vec<Edge>,
    link_start:  Vec<u32>,
    links:       Vec<(EdgeId, NodeId)>,
    degree:      Vec<u32>,
    by_name:     HashMap<String, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl AirportGraph {
    /// Build and validate a graph from a description.
    ///
    /// Fails with [`GraphError::Malformed`] for structural problems and
    /// [`GraphError::Disconnected`] when the reachability requirements do not
    /// hold.
    pub fn load(desc: &GraphDescription) -> GraphResult<Self> {
        // ── Nodes ─────────────────────────────────────────────────────────
        let mut nodes   = Vec::with_capacity(desc.nodes.len());
        let mut by_name = HashMap::with_capacity(desc.nodes.len());

        for (i, spec) in desc.nodes.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(GraphError::Malformed(format!("node #{i} has an empty name")));
            }
            let pos = Point::with_z(spec.x, spec.y, spec.z);
            if !pos.is_finite() {
                return Err(GraphError::Malformed(format!(
                    "node '{}' has non-finite coordinates",
                    spec.name
                )));
            }
            let id = NodeId::try_from(i)
                .map_err(|_| GraphError::Malformed("too many nodes".into()))?;
            if by_name.insert(spec.name.clone(), id).is_some() {
                return Err(GraphError::Malformed(format!("duplicate node id '{}'", spec.name)));
            }
            nodes.push(Node {
                id,
                name:          spec.name.clone(),
                kind:          spec.kind,
                pos,
                exit_priority: spec.exit_priority,
            });
        }

        if !nodes.iter().any(|n| n.kind == NodeKind::Gate) {
            return Err(GraphError::Malformed("graph declares no gate".into()));
        }
        if !nodes.iter().any(|n| n.kind == NodeKind::RunwayThreshold) {
            return Err(GraphError::Malformed("graph declares no runway threshold".into()));
        }

        let entries: Vec<NodeEntry> = nodes
            .iter()
            .map(|n| NodeEntry { point: [n.pos.x, n.pos.y], id: n.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        // ── Edges ─────────────────────────────────────────────────────────
        let resolve = |ep: &EdgeEndpoint, i: usize| -> GraphResult<NodeId> {
            match ep {
                EdgeEndpoint::Node(name) => by_name.get(name).copied().ok_or_else(|| {
                    GraphError::Malformed(format!("edge #{i} references unknown node '{name}'"))
                }),
                EdgeEndpoint::Point { x, y } => {
                    let tol = desc.snap_tolerance_m;
                    spatial_idx
                        .nearest_neighbor(&[*x, *y])
                        .filter(|e| e.distance_2(&[*x, *y]) <= tol * tol)
                        .map(|e| e.id)
                        .ok_or_else(|| {
                            GraphError::Malformed(format!(
                                "edge #{i} endpoint {ep} is not within {tol} m of any node"
                            ))
                        })
                }
            }
        };

        let mut edges = Vec::with_capacity(desc.edges.len());
        for (i, spec) in desc.edges.iter().enumerate() {
            let from = resolve(&spec.from, i)?;
            let to   = resolve(&spec.to, i)?;
            if from == to {
                return Err(GraphError::Malformed(format!(
                    "edge #{i} is a self loop on '{}'",
                    nodes[from.index()].name
                )));
            }
            let length_m = match spec.length_m {
                Some(l) => l,
                None    => nodes[from.index()].pos.distance_m(nodes[to.index()].pos),
            };
            if !(length_m.is_finite() && length_m > 0.0) {
                return Err(GraphError::Malformed(format!(
                    "edge #{i} has non-positive length {length_m}"
                )));
            }
            if !(spec.max_speed_mps.is_finite() && spec.max_speed_mps > 0.0) {
                return Err(GraphError::Malformed(format!(
                    "edge #{i} has non-positive speed limit {}",
                    spec.max_speed_mps
                )));
            }
            let id = EdgeId::try_from(i)
                .map_err(|_| GraphError::Malformed("too many edges".into()))?;
            edges.push(Edge {
                id,
                from,
                to,
                length_m,
                max_speed_mps: spec.max_speed_mps,
                directional:   spec.directional,
                runway:        spec.runway,
                name:          spec.name.clone(),
            });
        }

        // ── CSR links ─────────────────────────────────────────────────────
        let node_count = nodes.len();
        let mut raw: Vec<(NodeId, NodeId, EdgeId)> = Vec::with_capacity(edges.len() * 2);
        let mut degree = vec![0u32; node_count];
        for e in &edges {
            raw.push((e.from, e.to, e.id));
            if !e.directional {
                raw.push((e.to, e.from, e.id));
            }
            degree[e.from.index()] += 1;
            degree[e.to.index()] += 1;
        }
        raw.sort_unstable();

        let mut link_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &raw {
            link_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            link_start[i] += link_start[i - 1];
        }
        let links = raw.into_iter().map(|(_, to, e)| (e, to)).collect();

        let graph = AirportGraph { nodes, edges, link_start, links, degree, by_name, spatial_idx };
        validate::check_reachability(&graph)?;

        info!(
            "airport graph loaded: {} nodes, {} edges ({} runway), {} gates, {} thresholds",
            graph.node_count(),
            graph.edge_count(),
            graph.edges.iter().filter(|e| e.runway).count(),
            graph.nodes_of_kind(NodeKind::Gate).len(),
            graph.nodes_of_kind(NodeKind::RunwayThreshold).len(),
        );
        Ok(graph)
    }

    // ── Dimensions and arena access ───────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node by id.  Ids handed out by this graph are always valid; a foreign
    /// id panics like any out-of-range slice index.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Every `(edge, far node)` pair traversable from `node`, in ascending
    /// far-node then edge order.  Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.links_of(node).iter().copied()
    }

    fn links_of(&self, node: NodeId) -> &[(EdgeId, NodeId)] {
        let i = node.index();
        match (self.link_start.get(i), self.link_start.get(i + 1)) {
            (Some(&s), Some(&e)) => &self.links[s as usize..e as usize],
            _ => &[],
        }
    }

    /// The lowest-id edge traversable from `a` to `b`.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.links_of(a)
            .iter()
            .find(|&&(_, to)| to == b)
            .map(|&(e, _)| self.edge(e))
    }

    /// Number of physical edges touching `node`, regardless of direction.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.degree.get(node.index()).copied().unwrap_or(0) as usize
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// All nodes of `kind`, ascending by id.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.kind == kind).map(|n| n.id).collect()
    }

    /// Gates and runway thresholds, ascending by id.
    pub fn spawn_nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.kind.is_spawn()).map(|n| n.id).collect()
    }

    /// Nearest node to `pos` in the horizontal plane.  `None` only for an
    /// empty graph, which `load` never produces.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }

    /// Nearest node within `tolerance_m`, if any.
    pub fn snap_within(&self, pos: Point, tolerance_m: f64) -> Option<NodeId> {
        let q = [pos.x, pos.y];
        self.spatial_idx
            .nearest_neighbor(&q)
            .filter(|e| e.distance_2(&q) <= tolerance_m * tolerance_m)
            .map(|e| e.id)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Compass heading of `edge` when entered at `from`.
    pub fn edge_heading(&self, edge: EdgeId, from: NodeId) -> f64 {
        let e = self.edge(edge);
        let to = e.other(from).unwrap_or(e.to);
        self.node(from).pos.heading_to(self.node(to).pos)
    }

    /// Position `distance_m` along `edge` measured from `from`.  The
    /// distance is scaled onto the straight segment between the endpoints,
    /// so declared lengths longer than the geometry still map end to end.
    pub fn position_on_edge(&self, edge: EdgeId, from: NodeId, distance_m: f64) -> Point {
        let e = self.edge(edge);
        let to = e.other(from).unwrap_or(e.to);
        let t = if e.length_m > 0.0 { distance_m / e.length_m } else { 0.0 };
        self.node(from).pos.lerp(self.node(to).pos, t)
    }

    // ── Runways ───────────────────────────────────────────────────────────

    /// Follow runway edges away from `threshold` until the runway ends.
    ///
    /// At a fork the lowest-id continuing runway edge is taken; nodes are
    /// never revisited.
    pub fn runway_rollout(&self, threshold: NodeId) -> Rollout {
        let mut rollout = Rollout {
            nodes:       vec![threshold],
            edges:       Vec::new(),
            distances_m: vec![0.0],
        };
        if !self.contains_node(threshold) {
            return Rollout::default();
        }
        let mut cur = threshold;
        let mut travelled = 0.0;
        loop {
            let next = self
                .links_of(cur)
                .iter()
                .filter(|&&(e, to)| self.edge(e).runway && !rollout.nodes.contains(&to))
                .min_by_key(|&&(e, _)| e);
            let Some(&(e, to)) = next else { break };
            travelled += self.edge(e).length_m;
            rollout.nodes.push(to);
            rollout.edges.push(e);
            rollout.distances_m.push(travelled);
            cur = to;
        }
        rollout
    }
}
