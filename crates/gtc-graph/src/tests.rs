//! Unit tests for gtc-graph.

use crate::{AirportGraph, EdgeSpec, GraphDescription, NodeKind};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A (gate) — 100 m — B (intersection) — 200 m — C (runway threshold),
/// speed limit 10 m/s throughout.
fn line_description() -> GraphDescription {
    let mut d = GraphDescription::new();
    d.node("A", NodeKind::Gate, 0.0, 0.0)
        .node("B", NodeKind::Intersection, 0.0, 100.0)
        .node("C", NodeKind::RunwayThreshold, 0.0, 300.0)
        .edge(EdgeSpec::between("A", "B", 10.0).named("A"))
        .edge(EdgeSpec::between("B", "C", 10.0).runway().named("18"));
    d
}

fn line_graph() -> AirportGraph {
    AirportGraph::load(&line_description()).unwrap()
}

#[cfg(test)]
mod load {
    use super::*;
    use crate::{EdgeEndpoint, GraphError};
    use gtc_core::{NodeId, Point};

    #[test]
    fn ids_follow_declaration_order() {
        let g = line_graph();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.node_by_name("B"), Some(NodeId(1)));
        assert_eq!(g.node(NodeId(2)).kind, NodeKind::RunwayThreshold);
    }

    #[test]
    fn lengths_default_to_geometry() {
        let g = line_graph();
        assert!((g.edges()[0].length_m - 100.0).abs() < 1e-9);
        assert!((g.edges()[1].length_m - 200.0).abs() < 1e-9);
    }

    #[test]
    fn neighbors_and_edge_between() {
        let g = line_graph();
        let b = NodeId(1);
        let n: Vec<_> = g.neighbors(b).map(|(_, to)| to).collect();
        assert_eq!(n, vec![NodeId(0), NodeId(2)]);
        assert!(g.edge_between(NodeId(0), NodeId(1)).is_some());
        assert!(g.edge_between(NodeId(0), NodeId(2)).is_none());
        assert_eq!(g.degree(b), 2);
    }

    #[test]
    fn duplicate_names_are_malformed() {
        let mut d = line_description();
        d.node("A", NodeKind::TaxiwayPoint, 5.0, 5.0);
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Malformed(_))));
    }

    #[test]
    fn unknown_endpoint_is_malformed() {
        let mut d = line_description();
        d.edge(EdgeSpec::between("A", "Z", 10.0));
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Malformed(_))));
    }

    #[test]
    fn self_loop_and_bad_speed_are_malformed() {
        let mut d = line_description();
        d.edge(EdgeSpec::between("A", "A", 10.0).length(5.0));
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Malformed(_))));

        let mut d = line_description();
        d.edges[0].max_speed_mps = 0.0;
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Malformed(_))));
    }

    #[test]
    fn missing_gate_is_malformed() {
        let mut d = line_description();
        d.nodes[0].kind = NodeKind::TaxiwayPoint;
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Malformed(_))));
    }

    #[test]
    fn isolated_node_is_disconnected() {
        let mut d = line_description();
        d.node("X", NodeKind::TaxiwayPoint, 500.0, 500.0);
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Disconnected(_))));
    }

    #[test]
    fn one_way_toward_gate_is_disconnected() {
        let mut d = line_description();
        // C can reach A, but A can no longer reach C.
        d.edges[1] = EdgeSpec::between("C", "B", 10.0).directional().runway();
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Disconnected(_))));
    }

    #[test]
    fn coordinate_endpoint_snaps() {
        let mut d = line_description();
        d.node("T", NodeKind::TaxiwayPoint, 100.0, 100.0);
        d.edge(EdgeSpec::between(EdgeEndpoint::Point { x: 1.5, y: 99.0 }, "T", 10.0));
        let g = AirportGraph::load(&d).unwrap();
        let t = g.node_by_name("T").unwrap();
        let e = g.edge_between(NodeId(1), t).unwrap();
        assert_eq!(e.from, NodeId(1));
    }

    #[test]
    fn far_coordinate_endpoint_is_malformed() {
        let mut d = line_description();
        d.node("T", NodeKind::TaxiwayPoint, 100.0, 100.0);
        d.edge(EdgeSpec::between((40.0, 40.0), "T", 10.0));
        assert!(matches!(AirportGraph::load(&d), Err(GraphError::Malformed(_))));
    }

    #[test]
    fn snap_to_node_picks_nearest() {
        let g = line_graph();
        assert_eq!(g.snap_to_node(Point::new(3.0, 260.0)), Some(NodeId(2)));
        assert_eq!(g.snap_within(Point::new(3.0, 260.0), 10.0), None);
    }

    #[test]
    fn heading_and_position() {
        let g = line_graph();
        let e = g.edges()[0].id;
        assert!(g.edge_heading(e, NodeId(0)).abs() < 1e-9);
        assert!((g.edge_heading(e, NodeId(1)) - 180.0).abs() < 1e-9);
        assert_eq!(g.position_on_edge(e, NodeId(0), 25.0), Point::new(0.0, 25.0));
        assert_eq!(g.position_on_edge(e, NodeId(1), 25.0), Point::new(0.0, 75.0));
    }

    #[test]
    fn node_kind_parses_loosely() {
        assert_eq!("Hold_Short".parse::<NodeKind>().unwrap(), NodeKind::HoldShort);
        assert_eq!("runway-threshold".parse::<NodeKind>().unwrap(), NodeKind::RunwayThreshold);
        assert!("apron".parse::<NodeKind>().is_err());
    }
}

#[cfg(test)]
mod rollout {
    use super::*;
    use gtc_core::NodeId;

    /// Threshold T — exit E1 — exit E2 — far threshold U, with a taxiway
    /// from each exit back to gate G.
    fn runway_graph() -> AirportGraph {
        let mut d = GraphDescription::new();
        d.node("T", NodeKind::RunwayThreshold, 0.0, 0.0)
            .node("E1", NodeKind::RunwayExit, 0.0, 800.0)
            .node("E2", NodeKind::RunwayExit, 0.0, 1500.0)
            .node("U", NodeKind::RunwayThreshold, 0.0, 2500.0)
            .node("G", NodeKind::Gate, 300.0, 1000.0)
            .edge(EdgeSpec::between("T", "E1", 70.0).runway())
            .edge(EdgeSpec::between("E1", "E2", 70.0).runway())
            .edge(EdgeSpec::between("E2", "U", 70.0).runway())
            .edge(EdgeSpec::between("E1", "G", 10.0))
            .edge(EdgeSpec::between("E2", "G", 10.0));
        AirportGraph::load(&d).unwrap()
    }

    #[test]
    fn follows_runway_to_the_end() {
        let g = runway_graph();
        let r = g.runway_rollout(NodeId(0));
        assert_eq!(r.nodes, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(r.edges.len(), 3);
        assert!((r.distances_m[2] - 1500.0).abs() < 1e-9);
        assert!((r.total_length_m() - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_direction_from_far_threshold() {
        let g = runway_graph();
        let r = g.runway_rollout(NodeId(3));
        assert_eq!(r.nodes, vec![NodeId(3), NodeId(2), NodeId(1), NodeId(0)]);
    }
}

#[cfg(test)]
mod planner {
    use super::*;
    use crate::{DijkstraPlanner, PathPlanner, RoutingError};
    use gtc_core::NodeId;

    #[test]
    fn line_route_and_cost() {
        let g = line_graph();
        let r = DijkstraPlanner.plan(&g, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(r.cost_us, 30_000_000);
        assert!((r.total_secs() - 30.0).abs() < 1e-9);
        assert_eq!(r.turns, 0);
    }

    #[test]
    fn same_node_is_trivial() {
        let g = line_graph();
        let r = DijkstraPlanner.plan(&g, NodeId(1), NodeId(1)).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![NodeId(1)]);
    }

    #[test]
    fn unknown_node_is_rejected() {
        let g = line_graph();
        assert_eq!(
            DijkstraPlanner.plan(&g, NodeId(0), NodeId(99)),
            Err(RoutingError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn equal_cost_prefers_fewer_turns() {
        // D (id 1) sits off the straight line, so the node-id rule alone
        // would pick A-D-C.  The straight A-B-C has no turn and must win.
        let mut d = GraphDescription::new();
        d.node("A", NodeKind::Gate, 0.0, 0.0)
            .node("D", NodeKind::TaxiwayPoint, 80.0, 100.0)
            .node("B", NodeKind::TaxiwayPoint, 0.0, 100.0)
            .node("C", NodeKind::RunwayThreshold, 0.0, 200.0)
            .edge(EdgeSpec::between("A", "D", 10.0).length(100.0))
            .edge(EdgeSpec::between("D", "C", 10.0).length(100.0))
            .edge(EdgeSpec::between("A", "B", 10.0).length(100.0))
            .edge(EdgeSpec::between("B", "C", 10.0).length(100.0));
        let g = AirportGraph::load(&d).unwrap();
        let r = DijkstraPlanner.plan(&g, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(0), NodeId(2), NodeId(3)]);
        assert_eq!(r.turns, 0);
    }

    #[test]
    fn symmetric_tie_prefers_lower_node_ids() {
        let mut d = GraphDescription::new();
        d.node("A", NodeKind::Gate, 0.0, 0.0)
            .node("L", NodeKind::TaxiwayPoint, -50.0, 100.0)
            .node("R", NodeKind::TaxiwayPoint, 50.0, 100.0)
            .node("D", NodeKind::RunwayThreshold, 0.0, 200.0)
            .edge(EdgeSpec::between("A", "R", 10.0))
            .edge(EdgeSpec::between("R", "D", 10.0))
            .edge(EdgeSpec::between("A", "L", 10.0))
            .edge(EdgeSpec::between("L", "D", 10.0));
        let g = AirportGraph::load(&d).unwrap();
        let r = DijkstraPlanner.plan(&g, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(r.nodes, vec![NodeId(0), NodeId(1), NodeId(3)]);
    }

    #[test]
    fn avoiding_an_edge_takes_the_detour() {
        let mut d = GraphDescription::new();
        d.node("A", NodeKind::Gate, 0.0, 0.0)
            .node("B", NodeKind::TaxiwayPoint, 0.0, 100.0)
            .node("X", NodeKind::TaxiwayPoint, 100.0, 50.0)
            .edge(EdgeSpec::between("A", "B", 10.0))
            .edge(EdgeSpec::between("A", "X", 10.0))
            .edge(EdgeSpec::between("X", "B", 10.0))
            .node("C", NodeKind::RunwayThreshold, 0.0, 200.0)
            .edge(EdgeSpec::between("B", "C", 10.0).runway());
        let g = AirportGraph::load(&d).unwrap();
        let direct = DijkstraPlanner.plan(&g, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(direct.nodes, vec![NodeId(0), NodeId(1), NodeId(3)]);

        let detour = DijkstraPlanner
            .plan_avoiding(&g, NodeId(0), NodeId(3), &[direct.edges[0]])
            .unwrap();
        assert_eq!(detour.nodes, vec![NodeId(0), NodeId(2), NodeId(1), NodeId(3)]);

        let blocked = DijkstraPlanner.plan_avoiding(&g, NodeId(0), NodeId(3), &[direct.edges[1]]);
        assert!(matches!(blocked, Err(RoutingError::NoPath { .. })));
    }

    #[test]
    fn one_way_edges_are_respected() {
        let mut d = GraphDescription::new();
        d.node("A", NodeKind::Gate, 0.0, 0.0)
            .node("B", NodeKind::TaxiwayPoint, 0.0, 100.0)
            .node("C", NodeKind::RunwayThreshold, 0.0, 200.0)
            .node("Y", NodeKind::TaxiwayPoint, 200.0, 100.0)
            .edge(EdgeSpec::between("A", "B", 10.0).directional())
            .edge(EdgeSpec::between("B", "C", 10.0))
            .edge(EdgeSpec::between("C", "Y", 10.0).directional())
            .edge(EdgeSpec::between("Y", "A", 10.0).directional());
        let g = AirportGraph::load(&d).unwrap();
        let back = DijkstraPlanner.plan(&g, NodeId(2), NodeId(0)).unwrap();
        assert_eq!(back.nodes, vec![NodeId(2), NodeId(3), NodeId(0)]);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{load_graph_readers, read_description, EdgeEndpoint, GraphError, NodeKind};
    use gtc_core::NodeId;

    const NODES: &str = "\
name,kind,x,y,z,exit_priority
A,gate,0,0,,
B,intersection,0,100,,
C,runway-threshold,0,300,,
E,runway-exit,0,500,,2
";

    const EDGES: &str = "\
from,to,length_m,max_speed_mps,directional,runway,name
A,B,,10,false,false,A
B,C,,10,1,0,18
C,@0.5;499.5,,70,,yes,18
B,E,450,10,no,,B
";

    #[test]
    fn parses_description() {
        let d = read_description(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(d.nodes.len(), 4);
        assert_eq!(d.nodes[3].exit_priority, Some(2));
        assert_eq!(d.nodes[3].kind, NodeKind::RunwayExit);
        assert!(d.edges[1].directional && !d.edges[1].runway);
        assert!(d.edges[2].runway);
        assert_eq!(d.edges[2].to, EdgeEndpoint::Point { x: 0.5, y: 499.5 });
        assert_eq!(d.edges[3].length_m, Some(450.0));
        assert_eq!(d.edges[0].name.as_deref(), Some("A"));
    }

    #[test]
    fn loads_graph() {
        let g = load_graph_readers(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(g.edge_count(), 4);
        let r = g.runway_rollout(NodeId(2));
        assert_eq!(r.nodes, vec![NodeId(2), NodeId(3)]);
    }

    #[test]
    fn bad_flag_is_malformed() {
        let edges = "from,to,length_m,max_speed_mps,directional,runway,name\nA,B,,10,maybe,,\n";
        let err = read_description(Cursor::new(NODES), Cursor::new(edges)).unwrap_err();
        assert!(matches!(err, GraphError::Malformed(_)));
    }

    #[test]
    fn bad_number_is_csv_error() {
        let nodes = "name,kind,x,y,z,exit_priority\nA,gate,abc,0,,\n";
        let err = read_description(Cursor::new(nodes), Cursor::new(EDGES)).unwrap_err();
        assert!(matches!(err, GraphError::Csv(_)));
    }
}

#[cfg(test)]
mod optimality {
    use proptest::prelude::*;

    use crate::{AirportGraph, DijkstraPlanner, EdgeSpec, GraphDescription, NodeKind, PathPlanner};
    use gtc_core::NodeId;

    const SIDE: usize = 4;

    /// A SIDE×SIDE grid with per-edge speed limits; gate in one corner,
    /// runway threshold in the opposite one.
    fn grid(speeds: &[f64]) -> AirportGraph {
        let mut d = GraphDescription::new();
        for r in 0..SIDE {
            for c in 0..SIDE {
                let kind = match (r, c) {
                    (0, 0) => NodeKind::Gate,
                    (r, c) if r == SIDE - 1 && c == SIDE - 1 => NodeKind::RunwayThreshold,
                    _ => NodeKind::TaxiwayPoint,
                };
                d.node(format!("n{r}_{c}"), kind, c as f64 * 100.0, r as f64 * 100.0);
            }
        }
        let mut k = 0;
        for r in 0..SIDE {
            for c in 0..SIDE {
                if c + 1 < SIDE {
                    d.edge(EdgeSpec::between(format!("n{r}_{c}"), format!("n{r}_{}", c + 1), speeds[k]));
                    k += 1;
                }
                if r + 1 < SIDE {
                    d.edge(EdgeSpec::between(format!("n{r}_{c}"), format!("n{}_{c}", r + 1), speeds[k]));
                    k += 1;
                }
            }
        }
        AirportGraph::load(&d).unwrap()
    }

    /// Floyd–Warshall over the same integral edge costs.
    fn all_pairs(g: &AirportGraph) -> Vec<Vec<u64>> {
        let n = g.node_count();
        let mut dist = vec![vec![u64::MAX; n]; n];
        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0;
        }
        for e in g.edges() {
            let w = e.transit_us();
            let (a, b) = (e.from.index(), e.to.index());
            dist[a][b] = dist[a][b].min(w);
            if !e.directional {
                dist[b][a] = dist[b][a].min(w);
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if dist[i][k] != u64::MAX && dist[k][j] != u64::MAX {
                        let via = dist[i][k] + dist[k][j];
                        if via < dist[i][j] {
                            dist[i][j] = via;
                        }
                    }
                }
            }
        }
        dist
    }

    proptest! {
        #[test]
        fn prop_route_cost_is_shortest(
            speeds in proptest::collection::vec(2.0f64..30.0, 2 * SIDE * (SIDE - 1)),
            from in 0usize..SIDE * SIDE,
            to in 0usize..SIDE * SIDE,
        ) {
            let g = grid(&speeds);
            let truth = all_pairs(&g);
            let route = DijkstraPlanner.plan(&g, NodeId(from as u32), NodeId(to as u32)).unwrap();
            prop_assert_eq!(route.cost_us, truth[from][to]);

            let summed: u64 = route.edges.iter().map(|&e| g.edge(e).transit_us()).sum();
            prop_assert_eq!(summed, route.cost_us);
            prop_assert_eq!(route.nodes.first().copied(), Some(NodeId(from as u32)));
            prop_assert_eq!(route.nodes.last().copied(), Some(NodeId(to as u32)));
        }
    }
}
