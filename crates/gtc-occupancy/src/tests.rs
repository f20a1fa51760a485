//! Unit tests for gtc-occupancy.

use gtc_core::{AircraftId, EdgeId, NodeId, Tick, TimeWindow};
use gtc_graph::{AirportGraph, EdgeSpec, GraphDescription, NodeKind};

use crate::OccupancyManager;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// G (gate) — P (taxiway point) — H (hold short) ═ R (runway threshold).
///
/// | id | element          | policy    |
/// |----|------------------|-----------|
/// | n0 | G                | exclusive |
/// | n1 | P                | queued    |
/// | n2 | H                | exclusive |
/// | n3 | R                | exclusive |
/// | e0 | G–P taxiway 200m | queued    |
/// | e1 | P–H taxiway 200m | queued    |
/// | e2 | H–R runway       | exclusive |
fn graph() -> AirportGraph {
    let mut d = GraphDescription::new();
    d.node("G", NodeKind::Gate, 0.0, 0.0)
        .node("P", NodeKind::TaxiwayPoint, 0.0, 200.0)
        .node("H", NodeKind::HoldShort, 0.0, 400.0)
        .node("R", NodeKind::RunwayThreshold, 0.0, 500.0)
        .edge(EdgeSpec::between("G", "P", 10.0))
        .edge(EdgeSpec::between("P", "H", 10.0))
        .edge(EdgeSpec::between("H", "R", 10.0).runway());
    AirportGraph::load(&d).unwrap()
}

fn manager() -> OccupancyManager {
    OccupancyManager::new(&graph(), 60.0, 1.0)
}

fn open(t: u64) -> TimeWindow {
    TimeWindow::open_from(Tick(t))
}

const A: AircraftId = AircraftId(1);
const B: AircraftId = AircraftId(2);

#[cfg(test)]
mod policy {
    use super::*;
    use crate::{Element, Policy};

    #[test]
    fn policies_follow_kinds() {
        let m = manager();
        assert_eq!(m.policy(Element::Node(NodeId(0))), Policy::Exclusive);
        assert_eq!(m.policy(Element::Node(NodeId(1))), Policy::Queued);
        assert_eq!(m.policy(Element::Node(NodeId(2))), Policy::Exclusive);
        assert_eq!(m.policy(Element::Edge(EdgeId(0))), Policy::Queued);
        assert_eq!(m.policy(Element::Edge(EdgeId(2))), Policy::Exclusive);
        assert_eq!(m.policy(Element::Edge(EdgeId(99))), Policy::Exclusive);
    }
}

#[cfg(test)]
mod exclusive {
    use super::*;
    use crate::{Decision, DenyReason, Element};

    #[test]
    fn second_holder_is_denied_until_release() {
        let mut m = manager();
        let hs = Element::Node(NodeId(2));
        assert_eq!(m.request(A, hs, open(0)), Decision::Granted);

        let d = m.request(B, hs, open(1));
        let denial = d.denial().unwrap();
        assert_eq!(denial.element, hs);
        assert_eq!(denial.reason, DenyReason::Held { holder: A });

        assert!(m.release(A, hs));
        assert!(m.request(B, hs, open(2)).is_granted());
        assert_eq!(m.query(hs, Tick(2)), Some(B));
    }

    #[test]
    fn re_request_is_idempotent() {
        let mut m = manager();
        let rwy = Element::Edge(EdgeId(2));
        assert!(m.request(A, rwy, open(0)).is_granted());
        assert!(m.request(A, rwy, open(3)).is_granted());
        assert_eq!(m.reservations(rwy).len(), 1);
    }

    #[test]
    fn disjoint_windows_share_an_element() {
        let mut m = manager();
        let rwy = Element::Edge(EdgeId(2));
        assert!(m.request(A, rwy, TimeWindow::new(Tick(0), Tick(10))).is_granted());
        assert!(m.request(B, rwy, TimeWindow::new(Tick(10), Tick(20))).is_granted());
        assert!(!m.request(B, rwy, TimeWindow::new(Tick(5), Tick(12))).is_granted());
        assert_eq!(m.query(rwy, Tick(5)), Some(A));
        assert_eq!(m.query(rwy, Tick(15)), Some(B));
        assert_eq!(m.query(rwy, Tick(25)), None);
    }

    #[test]
    fn expire_drops_finished_windows() {
        let mut m = manager();
        let hs = Element::Node(NodeId(2));
        m.request(A, hs, TimeWindow::new(Tick(0), Tick(5)));
        m.request(B, Element::Node(NodeId(0)), open(0));
        assert_eq!(m.expire(Tick(5)), 1);
        assert!(!m.holds(A, hs));
        assert!(m.holds(B, Element::Node(NodeId(0))));
        assert_eq!(m.len(), 1);
    }
}

#[cfg(test)]
mod queued {
    use super::*;
    use crate::{Claim, DenyReason, Direction, Element};

    #[test]
    fn follower_waits_for_separation() {
        let mut m = manager();
        let twy = Claim::edge(EdgeId(0), Direction::Forward);
        assert!(m.request_directed(A, twy, open(0)).is_granted());
        m.update_progress(A, twy.element, 20.0, 10.0);

        let d = m.request_directed(B, twy, open(4));
        // 40 m short of 60 m at 10 m/s → 4 ticks.
        assert_eq!(
            d.denial().map(|d| d.reason),
            Some(DenyReason::Separation { holder: A, retry_at: Tick(8) })
        );

        m.update_progress(A, twy.element, 60.0, 10.0);
        assert!(m.request_directed(B, twy, open(8)).is_granted());
        assert_eq!(m.holders(twy.element, Tick(8)), vec![A, B]);
        assert_eq!(m.query(twy.element, Tick(8)), Some(A));
    }

    #[test]
    fn stopped_holder_gives_retry_next_tick() {
        let mut m = manager();
        let twy = Claim::edge(EdgeId(1), Direction::Forward);
        m.request_directed(A, twy, open(0));
        let d = m.request_directed(B, twy, open(3));
        assert_eq!(d.denial().and_then(|d| d.reason.retry_at()), Some(Tick(4)));
    }

    #[test]
    fn opposite_direction_is_head_on() {
        let mut m = manager();
        m.request_directed(A, Claim::edge(EdgeId(0), Direction::Forward), open(0));
        m.update_progress(A, Element::Edge(EdgeId(0)), 150.0, 10.0);
        let d = m.request_directed(B, Claim::edge(EdgeId(0), Direction::Reverse), open(1));
        assert_eq!(d.denial().map(|d| d.reason), Some(DenyReason::HeadOn { holder: A }));
    }

    #[test]
    fn taxiway_points_never_refuse() {
        let mut m = manager();
        let p = Element::Node(NodeId(1));
        assert!(m.request(A, p, open(0)).is_granted());
        assert!(m.request(B, p, open(0)).is_granted());
    }
}

#[cfg(test)]
mod atomic {
    use super::*;
    use crate::{Claim, Direction, Element};

    #[test]
    fn request_all_is_all_or_nothing() {
        let mut m = manager();
        m.request(A, Element::Edge(EdgeId(2)), open(0));

        let claims = [Claim::node(NodeId(2)), Claim::edge(EdgeId(2), Direction::Forward)];
        let d = m.request_all(B, &claims, open(1));
        assert!(!d.is_granted());
        assert_eq!(d.denial().map(|d| d.element), Some(Element::Edge(EdgeId(2))));
        assert!(!m.holds(B, Element::Node(NodeId(2))));
        assert_eq!(m.held_by(B).count(), 0);
    }

    #[test]
    fn release_all_clears_every_element() {
        let mut m = manager();
        let claims = [
            Claim::node(NodeId(0)),
            Claim::edge(EdgeId(0), Direction::Forward),
            Claim::node(NodeId(2)),
        ];
        assert!(m.request_all(A, &claims, open(0)).is_granted());
        let released = m.release_all(A);
        assert_eq!(
            released,
            vec![Element::Node(NodeId(0)), Element::Node(NodeId(2)), Element::Edge(EdgeId(0))]
        );
        assert!(m.is_empty());
        assert!(!m.release(A, Element::Node(NodeId(0))));
    }
}

#[cfg(test)]
mod resolver {
    use super::*;
    use crate::{Claim, ClaimRequest, ConflictResolver, Decision, DenyReason, Direction, Element};
    use gtc_core::PriorityClass;

    fn runway_claim(id: u32, priority: PriorityClass, spawn: u64) -> ClaimRequest {
        ClaimRequest {
            aircraft:   AircraftId(id),
            priority,
            spawn_tick: Tick(spawn),
            claims:     vec![Claim::edge(EdgeId(2), Direction::Forward)],
        }
    }

    #[test]
    fn equal_spawn_tick_lower_id_wins() {
        let mut m = manager();
        let batch = vec![
            runway_claim(7, PriorityClass::Departure, 5),
            runway_claim(2, PriorityClass::Departure, 5),
        ];
        let res = ConflictResolver.resolve(batch, &mut m, open(12));

        assert_eq!(res.decision_for(AircraftId(2)), Some(&Decision::Granted));
        let lost = res.decision_for(AircraftId(7)).and_then(|d| d.denial()).unwrap();
        assert_eq!(lost.reason, DenyReason::LostTieBreak { winner: AircraftId(2) });
        assert_eq!(res.contested, vec![Element::Edge(EdgeId(2))]);
        assert_eq!(m.query(Element::Edge(EdgeId(2)), Tick(12)), Some(AircraftId(2)));
    }

    #[test]
    fn earlier_spawn_beats_lower_id() {
        let mut m = manager();
        let batch = vec![
            runway_claim(2, PriorityClass::Departure, 9),
            runway_claim(7, PriorityClass::Departure, 3),
        ];
        let res = ConflictResolver.resolve(batch, &mut m, open(12));
        assert_eq!(res.granted().collect::<Vec<_>>(), vec![AircraftId(7)]);
    }

    #[test]
    fn arrival_outranks_departure() {
        let mut m = manager();
        let batch = vec![
            runway_claim(1, PriorityClass::Departure, 0),
            runway_claim(9, PriorityClass::Arrival, 50),
        ];
        let res = ConflictResolver.resolve(batch, &mut m, open(60));
        assert_eq!(res.granted().collect::<Vec<_>>(), vec![AircraftId(9)]);
        assert_eq!(res.denied_count(), 1);
    }

    #[test]
    fn emergency_outranks_arrival() {
        let mut m = manager();
        let batch = vec![
            runway_claim(1, PriorityClass::Arrival, 0),
            runway_claim(9, PriorityClass::Emergency, 50),
        ];
        let res = ConflictResolver.resolve(batch, &mut m, open(60));
        assert_eq!(res.granted().collect::<Vec<_>>(), vec![AircraftId(9)]);
    }

    #[test]
    fn existing_holder_is_not_a_tie_break() {
        let mut m = manager();
        m.request(AircraftId(4), Element::Edge(EdgeId(2)), open(0));
        let res = ConflictResolver.resolve(vec![runway_claim(2, PriorityClass::Arrival, 1)], &mut m, open(3));
        let d = res.decision_for(AircraftId(2)).and_then(|d| d.denial()).unwrap();
        assert_eq!(d.reason, DenyReason::Held { holder: AircraftId(4) });
        assert!(res.contested.is_empty());
    }

    #[test]
    fn winning_elsewhere_is_not_a_tie_break() {
        let mut m = manager();
        let twy = Claim::edge(EdgeId(0), Direction::Forward);
        assert!(m.request_directed(A, twy, open(0)).is_granted());
        m.update_progress(A, twy.element, 10.0, 10.0);

        let batch = vec![
            ClaimRequest {
                aircraft:   A,
                priority:   PriorityClass::Departure,
                spawn_tick: Tick(0),
                claims:     vec![Claim::edge(EdgeId(1), Direction::Forward)],
            },
            ClaimRequest {
                aircraft:   B,
                priority:   PriorityClass::Departure,
                spawn_tick: Tick(1),
                claims:     vec![twy],
            },
        ];
        let res = ConflictResolver.resolve(batch, &mut m, open(3));

        assert_eq!(res.decision_for(A), Some(&Decision::Granted));
        let d = res.decision_for(B).and_then(|d| d.denial()).unwrap();
        // 50 m short of 60 m at 10 m/s.
        assert_eq!(d.reason, DenyReason::Separation { holder: A, retry_at: Tick(8) });
        assert_eq!(d.reason.retry_at(), Some(Tick(8)));
        assert!(res.contested.is_empty());
    }

    #[test]
    fn uncontested_requests_all_granted() {
        let mut m = manager();
        let batch = vec![
            ClaimRequest {
                aircraft:   AircraftId(1),
                priority:   PriorityClass::Departure,
                spawn_tick: Tick(0),
                claims:     vec![Claim::node(NodeId(0))],
            },
            runway_claim(2, PriorityClass::Departure, 0),
        ];
        let res = ConflictResolver.resolve(batch, &mut m, open(1));
        assert_eq!(res.granted().count(), 2);
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::{Claim, Direction, Element};

    #[derive(Debug, Clone)]
    enum Op {
        Request { who: u32, element: usize, reverse: bool },
        Progress { who: u32, element: usize, distance: f64 },
        Release { who: u32, element: usize },
        ReleaseAll { who: u32 },
    }

    const ELEMENTS: [Element; 7] = [
        Element::Node(NodeId(0)),
        Element::Node(NodeId(1)),
        Element::Node(NodeId(2)),
        Element::Node(NodeId(3)),
        Element::Edge(EdgeId(0)),
        Element::Edge(EdgeId(1)),
        Element::Edge(EdgeId(2)),
    ];

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u32..5, 0usize..7, any::<bool>())
                .prop_map(|(who, element, reverse)| Op::Request { who, element, reverse }),
            2 => (0u32..5, 0usize..7, 0.0f64..200.0)
                .prop_map(|(who, element, distance)| Op::Progress { who, element, distance }),
            1 => (0u32..5, 0usize..7).prop_map(|(who, element)| Op::Release { who, element }),
            1 => (0u32..5).prop_map(|who| Op::ReleaseAll { who }),
        ]
    }

    proptest! {
        #[test]
        fn prop_exclusive_elements_have_one_holder(ops in proptest::collection::vec(op(), 1..80)) {
            let mut m = manager();
            for (t, op) in ops.into_iter().enumerate() {
                let now = Tick(t as u64);
                match op {
                    Op::Request { who, element, reverse } => {
                        let claim = Claim {
                            element:   ELEMENTS[element],
                            direction: if reverse { Direction::Reverse } else { Direction::Forward },
                        };
                        m.request_directed(AircraftId(who), claim, TimeWindow::open_from(now));
                    }
                    Op::Progress { who, element, distance } => {
                        m.update_progress(AircraftId(who), ELEMENTS[element], distance, 5.0);
                    }
                    Op::Release { who, element } => {
                        m.release(AircraftId(who), ELEMENTS[element]);
                    }
                    Op::ReleaseAll { who } => {
                        m.release_all(AircraftId(who));
                    }
                }
                for el in ELEMENTS {
                    let holders = m.holders(el, now);
                    if m.is_exclusive(el) {
                        prop_assert!(holders.len() <= 1, "{el} held by {holders:?}");
                    }
                    if let Element::Edge(_) = el {
                        let dirs: Vec<Direction> = m.reservations(el).iter().map(|r| r.direction).collect();
                        prop_assert!(dirs.windows(2).all(|w| w[0] == w[1]), "mixed directions on {el}");
                    }
                }
            }
        }
    }
}
