//! Built-in layout loosely modelled on Frederick Municipal (KFDK).
//!
//! Metres in a local frame, +x east and +y north.  Runway 05/23 runs
//! east–west south of the ramp with parallel taxiway A; runway 12/30 runs
//! north–south east of the field, reached over taxiway B.
//!
//! ```text
//!          G1      G2      G3                         RWY12
//!            \     |      /                             ║
//!             RAMP_CENTER                 B2 ── H12 ────╢
//!                  |                      |             ║
//!   A1 ── A2 ──── A3 ──── A4 ── A5 ────── B1 ────────── XB1
//!   |     |               |     |         |             ║
//!  H05    |               |    H23        B3 ────────── XB2
//!   |     |               |     |         |             ║
//!  RWY05══XA3═════════════XA4══RWY23      B4 ── H30 ─── RWY30
//! ```

use gtc_graph::{AirportGraph, EdgeSpec, GraphDescription, GraphResult, NodeKind};

const TAXI_MPS:   f64 = 10.0;
const RAMP_MPS:   f64 = 5.0;
/// Backtaxi limit.  Landing rollouts decelerate from touchdown speed
/// regardless; this keeps the planner off the runways for ordinary taxiing.
const RUNWAY_MPS: f64 = 5.0;

pub fn describe() -> GraphDescription {
    let mut d = GraphDescription::new();

    // Ramp
    d.node("GATE_1", NodeKind::Gate, -600.0, 400.0)
        .node("GATE_2", NodeKind::Gate, 0.0, 400.0)
        .node("GATE_3", NodeKind::Gate, 600.0, 400.0)
        .node("RAMP_CENTER", NodeKind::Intersection, 0.0, 200.0);

    // Taxiway A
    d.node("A1", NodeKind::Intersection, -1500.0, -300.0)
        .node("A2", NodeKind::Intersection, -500.0, -300.0)
        .node("A3", NodeKind::Intersection, 0.0, -300.0)
        .node("A4", NodeKind::Intersection, 500.0, -300.0)
        .node("A5", NodeKind::Intersection, 1500.0, -300.0)
        .node("HOLD_05", NodeKind::HoldShort, -1500.0, -450.0)
        .node("HOLD_23", NodeKind::HoldShort, 1500.0, -450.0);

    // Runway 05/23
    d.node("RWY05", NodeKind::RunwayThreshold, -1500.0, -600.0)
        .node("EXIT_A3", NodeKind::RunwayExit, -500.0, -600.0)
        .node("EXIT_A4", NodeKind::RunwayExit, 500.0, -600.0)
        .node("RWY23", NodeKind::RunwayThreshold, 1500.0, -600.0);

    // Taxiway B
    d.node("B1", NodeKind::Intersection, 1700.0, 0.0)
        .node("B2", NodeKind::TaxiwayPoint, 1700.0, 1000.0)
        .node("B3", NodeKind::Intersection, 1700.0, -1000.0)
        .node("B4", NodeKind::TaxiwayPoint, 1700.0, -2000.0)
        .node("HOLD_12", NodeKind::HoldShort, 1850.0, 1000.0)
        .node("HOLD_30", NodeKind::HoldShort, 1850.0, -2000.0);

    // Runway 12/30
    d.node("RWY12", NodeKind::RunwayThreshold, 2000.0, 1000.0)
        .node("EXIT_B1", NodeKind::RunwayExit, 2000.0, 0.0)
        .node("EXIT_B2", NodeKind::RunwayExit, 2000.0, -1000.0)
        .node("RWY30", NodeKind::RunwayThreshold, 2000.0, -2000.0);

    for gate in ["GATE_1", "GATE_2", "GATE_3"] {
        d.edge(EdgeSpec::between(gate, "RAMP_CENTER", RAMP_MPS).named("RAMP"));
    }
    d.edge(EdgeSpec::between("RAMP_CENTER", "A3", TAXI_MPS).named("R"));

    for (from, to) in [("A1", "A2"), ("A2", "A3"), ("A3", "A4"), ("A4", "A5")] {
        d.edge(EdgeSpec::between(from, to, TAXI_MPS).named("A"));
    }
    d.edge(EdgeSpec::between("A1", "HOLD_05", TAXI_MPS).named("A1"))
        .edge(EdgeSpec::between("HOLD_05", "RWY05", TAXI_MPS).named("A1"))
        .edge(EdgeSpec::between("A5", "HOLD_23", TAXI_MPS).named("A5"))
        .edge(EdgeSpec::between("HOLD_23", "RWY23", TAXI_MPS).named("A5"))
        .edge(EdgeSpec::between("EXIT_A3", "A2", TAXI_MPS).named("A3"))
        .edge(EdgeSpec::between("EXIT_A4", "A4", TAXI_MPS).named("A4"));

    for (from, to) in [("RWY05", "EXIT_A3"), ("EXIT_A3", "EXIT_A4"), ("EXIT_A4", "RWY23")] {
        d.edge(EdgeSpec::between(from, to, RUNWAY_MPS).runway().named("05/23"));
    }

    d.edge(EdgeSpec::between("A5", "B1", TAXI_MPS).named("B"));
    for (from, to) in [("B2", "B1"), ("B1", "B3"), ("B3", "B4")] {
        d.edge(EdgeSpec::between(from, to, TAXI_MPS).named("B"));
    }
    d.edge(EdgeSpec::between("B2", "HOLD_12", TAXI_MPS).named("B2"))
        .edge(EdgeSpec::between("HOLD_12", "RWY12", TAXI_MPS).named("B2"))
        .edge(EdgeSpec::between("B4", "HOLD_30", TAXI_MPS).named("B4"))
        .edge(EdgeSpec::between("HOLD_30", "RWY30", TAXI_MPS).named("B4"))
        .edge(EdgeSpec::between("EXIT_B1", "B1", TAXI_MPS).named("B1"))
        .edge(EdgeSpec::between("EXIT_B2", "B3", TAXI_MPS).named("B3"));

    for (from, to) in [("RWY12", "EXIT_B1"), ("EXIT_B1", "EXIT_B2"), ("EXIT_B2", "RWY30")] {
        d.edge(EdgeSpec::between(from, to, RUNWAY_MPS).runway().named("12/30"));
    }

    d
}

pub fn build() -> GraphResult<AirportGraph> {
    AirportGraph::load(&describe())
}
