//! CSV graph loader.
//!
//! # CSV format
//!
//! Two files: one row per node, one row per edge.
//!
//! ```csv
//! name,kind,x,y,z,exit_priority
//! G1,gate,0,0,,
//! HS05,hold-short,0,120,,
//! R05-A,runway-threshold,-400,200,,
//! R05-E1,runway-exit,0,200,,1
//! ```
//!
//! ```csv
//! from,to,length_m,max_speed_mps,directional,runway,name
//! G1,HS05,,10,false,false,A
//! HS05,R05-E1,,10,,,A
//! R05-A,@0.4;199.8,,70,true,true,05
//! ```
//!
//! | Column          | Meaning                                               |
//! |-----------------|-------------------------------------------------------|
//! | `kind`          | `gate`, `runway-threshold`, `runway-exit`, `intersection`, `hold-short`, `taxiway-point` |
//! | `z`             | optional, defaults to 0                               |
//! | `exit_priority` | optional runway-exit tie-break rank                   |
//! | `from` / `to`   | a node name, or `@x;y` to snap to the nearest node    |
//! | `length_m`      | optional, Euclidean distance when empty               |
//! | `directional` / `runway` | `true`/`false`/`1`/`0`/`yes`/`no`, empty = false |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::description::{
    EdgeEndpoint, EdgeSpec, GraphDescription, NodeKind, NodeSpec, DEFAULT_SNAP_TOLERANCE_M,
};
use crate::graph::AirportGraph;
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    name:          String,
    kind:          String,
    x:             f64,
    y:             f64,
    z:             Option<f64>,
    exit_priority: Option<u32>,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:          String,
    to:            String,
    length_m:      Option<f64>,
    max_speed_mps: f64,
    directional:   Option<String>,
    runway:        Option<String>,
    name:          Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and validate a graph from a node CSV and an edge CSV.
pub fn load_graph_csv(nodes: &Path, edges: &Path) -> GraphResult<AirportGraph> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_graph_readers(nodes, edges)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
pub fn load_graph_readers<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<AirportGraph> {
    let desc = read_description(nodes, edges)?;
    AirportGraph::load(&desc)
}

/// Parse the two CSV sources into a [`GraphDescription`] without loading it.
pub fn read_description<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<GraphDescription> {
    let mut desc = GraphDescription::new();
    desc.snap_tolerance_m = DEFAULT_SNAP_TOLERANCE_M;

    let mut node_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for row in node_reader.deserialize::<NodeRecord>() {
        let row = row?;
        let kind: NodeKind = row.kind.parse()?;
        let mut spec = NodeSpec::new(row.name, kind, row.x, row.y).with_z(row.z.unwrap_or(0.0));
        spec.exit_priority = row.exit_priority;
        desc.nodes.push(spec);
    }

    let mut edge_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(edges);
    for (i, row) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
        let row = row?;
        desc.edges.push(EdgeSpec {
            from:          parse_endpoint(&row.from, i)?,
            to:            parse_endpoint(&row.to, i)?,
            length_m:      row.length_m,
            max_speed_mps: row.max_speed_mps,
            directional:   parse_flag(row.directional.as_deref(), "directional", i)?,
            runway:        parse_flag(row.runway.as_deref(), "runway", i)?,
            name:          row.name.filter(|n| !n.is_empty()),
        });
    }

    Ok(desc)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_endpoint(s: &str, row: usize) -> GraphResult<EdgeEndpoint> {
    let Some(coords) = s.strip_prefix('@') else {
        return Ok(EdgeEndpoint::Node(s.to_owned()));
    };
    let bad = || GraphError::Malformed(format!("edge row {row}: bad coordinate endpoint '{s}'"));
    let (x, y) = coords.split_once(';').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    Ok(EdgeEndpoint::Point { x, y })
}

fn parse_flag(v: Option<&str>, column: &str, row: usize) -> GraphResult<bool> {
    match v.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => Err(GraphError::Malformed(format!(
            "edge row {row}: '{other}' is not a valid {column} flag"
        ))),
    }
}
