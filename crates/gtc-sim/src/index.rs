//! Per-tick index of who is where on each edge.
//!
//! Built once from the start-of-tick snapshot and shared read-only by every
//! proposal.  With the `fx-hash` feature the map uses FxHash, which is
//! noticeably faster on small integer keys.

use gtc_agent::{Aircraft, TrafficView};
use gtc_core::{AircraftId, EdgeId};
use gtc_graph::AirportGraph;
use gtc_occupancy::Direction;

#[cfg(feature = "fx-hash")]
type EdgeMap<V> = rustc_hash::FxHashMap<(EdgeId, Direction), V>;
#[cfg(not(feature = "fx-hash"))]
type EdgeMap<V> = std::collections::HashMap<(EdgeId, Direction), V>;

/// `(edge, direction) → [(distance along edge, aircraft)]`.
#[derive(Default)]
pub struct EdgeTraffic {
    by_edge: EdgeMap<Vec<(f64, AircraftId)>>,
}

impl EdgeTraffic {
    /// Index every aircraft that has entered its current edge.
    pub fn build<'a>(graph: &AirportGraph, aircraft: impl IntoIterator<Item = &'a Aircraft>) -> Self {
        let mut by_edge: EdgeMap<Vec<(f64, AircraftId)>> = EdgeMap::default();
        for ac in aircraft {
            if !ac.is_moving_on_route() {
                continue;
            }
            by_edge
                .entry((ac.current_edge(), ac.direction(graph)))
                .or_default()
                .push((ac.distance_m, ac.id));
        }
        EdgeTraffic { by_edge }
    }

    pub fn on_edge(&self, edge: EdgeId, direction: Direction) -> &[(f64, AircraftId)] {
        self.by_edge.get(&(edge, direction)).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl TrafficView for EdgeTraffic {
    fn nearest_ahead(&self, edge: EdgeId, direction: Direction, from_m: f64, me: AircraftId) -> Option<f64> {
        self.on_edge(edge, direction)
            .iter()
            .filter(|&&(d, id)| id != me && d >= from_m)
            .map(|&(d, _)| d)
            .min_by(f64::total_cmp)
    }
}
