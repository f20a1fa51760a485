//! Run configuration.
//!
//! `TrafficConfig` is a plain struct so it can be built in code; with the
//! `serde` feature it also deserializes from partial JSON/TOML documents,
//! with every missing field taking its default.

use crate::error::{CoreError, CoreResult};

/// Options recognised by the traffic engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrafficConfig {
    /// Simulated seconds per tick.
    pub tick_duration_secs: f64,

    /// Minimum along-edge trailing distance between aircraft sharing a
    /// taxiway edge, in metres.
    pub min_taxi_separation_m: f64,

    /// Arrival braking limit, m/s².
    pub max_deceleration_mps2: f64,

    /// Ticks without forward progress before an aircraft is force-despawned.
    pub stuck_timeout_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub random_seed: u64,

    /// Ground speed at which arrivals appear on the runway.
    pub touchdown_speed_mps: f64,

    /// Speed an arrival decelerates to before leaving the runway.
    pub taxi_speed_mps: f64,

    /// Consecutive denied ticks before the planner is asked for a new route.
    pub replan_after_denials: u32,

    /// Distance either side of a node over which headings are blended.
    pub turn_blend_m: f64,

    /// Cap on simultaneously active aircraft.  `None` = unlimited.
    pub max_active_aircraft: Option<usize>,

    /// Write output every N ticks.
    pub output_interval_ticks: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs:    1.0,
            min_taxi_separation_m: 60.0,
            max_deceleration_mps2: 2.5,
            stuck_timeout_ticks:   300,
            random_seed:           42,
            touchdown_speed_mps:   70.0,
            taxi_speed_mps:        10.0,
            replan_after_denials:  15,
            turn_blend_m:          20.0,
            max_active_aircraft:   None,
            output_interval_ticks: 1,
        }
    }
}

impl TrafficConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        positive("tick_duration_secs", self.tick_duration_secs)?;
        positive("max_deceleration_mps2", self.max_deceleration_mps2)?;
        positive("touchdown_speed_mps", self.touchdown_speed_mps)?;
        positive("taxi_speed_mps", self.taxi_speed_mps)?;
        non_negative("min_taxi_separation_m", self.min_taxi_separation_m)?;
        non_negative("turn_blend_m", self.turn_blend_m)?;

        if self.taxi_speed_mps > self.touchdown_speed_mps {
            return Err(CoreError::Config(format!(
                "taxi_speed_mps ({}) exceeds touchdown_speed_mps ({})",
                self.taxi_speed_mps, self.touchdown_speed_mps
            )));
        }
        if self.stuck_timeout_ticks == 0 {
            return Err(CoreError::Config("stuck_timeout_ticks must be at least 1".into()));
        }
        if self.replan_after_denials == 0 {
            return Err(CoreError::Config("replan_after_denials must be at least 1".into()));
        }
        if self.output_interval_ticks == 0 {
            return Err(CoreError::Config("output_interval_ticks must be at least 1".into()));
        }
        if self.max_active_aircraft == Some(0) {
            return Err(CoreError::Config("max_active_aircraft must be at least 1 when set".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be finite and > 0, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be finite and >= 0, got {v}")))
    }
}
