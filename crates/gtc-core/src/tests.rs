//! Unit tests for gtc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AircraftId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AircraftId(2) < AircraftId(7));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(AircraftId::default(), AircraftId::INVALID);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AircraftId(7).to_string(), "AircraftId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;
    use crate::geo::{blend_heading, heading_delta, normalize_heading};

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_m(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn compass_headings() {
        let o = Point::new(0.0, 0.0);
        assert!((o.heading_to(Point::new(0.0, 10.0)) - 0.0).abs() < 1e-9);
        assert!((o.heading_to(Point::new(10.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((o.heading_to(Point::new(0.0, -10.0)) - 180.0).abs() < 1e-9);
        assert!((o.heading_to(Point::new(-10.0, 0.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn delta_takes_shortest_arc() {
        assert!((heading_delta(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((heading_delta(10.0, 350.0) + 20.0).abs() < 1e-9);
        assert!((heading_delta(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn blend_wraps_through_north() {
        let mid = blend_heading(350.0, 10.0, 0.5);
        assert!(mid.abs() < 1e-9 || (mid - 360.0).abs() < 1e-9, "got {mid}");
        assert!((blend_heading(90.0, 180.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((blend_heading(90.0, 180.0, 2.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_range() {
        assert!((normalize_heading(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_heading(720.0)).abs() < 1e-9);
    }

    #[test]
    fn lerp_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 0.0));
        assert_eq!(a.lerp(b, 1.5), b);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick, TimeWindow};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3) - Tick(10), 0u64);
        assert_eq!(Tick::MAX.offset(1), Tick::MAX);
    }

    #[test]
    fn window_half_open() {
        let w = TimeWindow::new(Tick(5), Tick(10));
        assert!(w.contains(Tick(5)));
        assert!(w.contains(Tick(9)));
        assert!(!w.contains(Tick(10)));
    }

    #[test]
    fn window_overlap() {
        let a = TimeWindow::new(Tick(0), Tick(10));
        let b = TimeWindow::new(Tick(10), Tick(20));
        let c = TimeWindow::open_from(Tick(15));
        assert!(!a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&c));
        assert!(c.is_open_ended());
    }

    #[test]
    fn empty_window_never_overlaps() {
        let e = TimeWindow::new(Tick(8), Tick(3));
        assert!(e.is_empty());
        assert!(!e.overlaps(&TimeWindow::open_from(Tick::ZERO)));
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(0.5);
        clock.advance();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(3));
        assert!((clock.elapsed_secs() - 1.5).abs() < 1e-12);
        assert_eq!(clock.ticks_for_secs(2.1), 5);
    }
}

#[cfg(test)]
mod config {
    use crate::TrafficConfig;

    #[test]
    fn defaults_validate() {
        assert!(TrafficConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_tick() {
        let cfg = TrafficConfig { tick_duration_secs: 0.0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = TrafficConfig { tick_duration_secs: f64::NAN, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_taxi_faster_than_touchdown() {
        let cfg = TrafficConfig { taxi_speed_mps: 80.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = TrafficConfig { stuck_timeout_ticks: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AircraftRng, SimRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AircraftRng::new(42, 7);
        let mut b = AircraftRng::new(42, 7);
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn instance_seed_changes_stream() {
        let mut a = AircraftRng::new(42, 1);
        let mut b = AircraftRng::new(42, 2);
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn child_is_deterministic() {
        let mut a = SimRng::new(9);
        let mut b = SimRng::new(9);
        assert_eq!(a.child(3).random::<u32>(), b.child(3).random::<u32>());
    }

    #[test]
    fn choose_empty_is_none() {
        let mut r = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(r.choose(&empty).is_none());
    }
}

#[cfg(test)]
mod traffic {
    use crate::{FlightKind, PriorityClass};

    #[test]
    fn precedence_order() {
        let e = PriorityClass::of(FlightKind::Departure, true);
        let a = PriorityClass::of(FlightKind::Arrival, false);
        let d = PriorityClass::of(FlightKind::Departure, false);
        assert!(e < a && a < d);
    }
}
