//! Ground kinematics.
//!
//! Everything here is a pure function of its arguments so the propose phase
//! can call it from worker threads.

use gtc_core::geo::blend_heading;

/// Distances below this are treated as zero.
pub const EPS_M: f64 = 1e-9;

/// Constant deceleration from `v0` towards `v_floor` over one step of `dt`
/// seconds, never dropping below `v_floor`.
///
/// Returns `(distance travelled, velocity at the end of the step)`.  The
/// distance is the exact area under the piecewise-linear velocity profile,
/// so a step that reaches the floor part-way through continues at the floor
/// for the rest of it.
pub fn decelerate(v0: f64, decel_mps2: f64, v_floor: f64, dt: f64) -> (f64, f64) {
    if v0 <= v_floor || decel_mps2 <= 0.0 {
        let v = v0.max(v_floor);
        return (v * dt, v);
    }
    let t_floor = (v0 - v_floor) / decel_mps2;
    if t_floor >= dt {
        let v1 = v0 - decel_mps2 * dt;
        (0.5 * (v0 + v1) * dt, v1)
    } else {
        let braking = 0.5 * (v0 + v_floor) * t_floor;
        (braking + v_floor * (dt - t_floor), v_floor)
    }
}

/// Distance needed to slow from `v0` to `v1` at a constant `decel_mps2`.
pub fn stopping_distance(v0: f64, v1: f64, decel_mps2: f64) -> f64 {
    if v0 <= v1 || decel_mps2 <= 0.0 {
        return 0.0;
    }
    (v0 * v0 - v1 * v1) / (2.0 * decel_mps2)
}

/// Heading `distance_m` along an edge of length `length_m` whose own heading
/// is `current`.
///
/// Within `blend_m` of either end the heading is eased towards the
/// neighbouring edge's heading (`previous` at the start, `next` at the end)
/// so that it is exactly the midpoint of the two at the shared node.  When
/// both ends are in range the nearer one decides.
pub fn blended_heading(
    previous:   Option<f64>,
    current:    f64,
    next:       Option<f64>,
    distance_m: f64,
    length_m:   f64,
    blend_m:    f64,
) -> f64 {
    if blend_m <= 0.0 {
        return current;
    }
    let remaining = (length_m - distance_m).max(0.0);
    let near_start = previous.filter(|_| distance_m < blend_m);
    let near_end = next.filter(|_| remaining < blend_m);

    match (near_start, near_end) {
        (Some(prev), Some(_)) if distance_m <= remaining => {
            blend_heading(prev, current, 0.5 + distance_m / (2.0 * blend_m))
        }
        (_, Some(next)) => blend_heading(current, next, (blend_m - remaining) / (2.0 * blend_m)),
        (Some(prev), None) => blend_heading(prev, current, 0.5 + distance_m / (2.0 * blend_m)),
        (None, None) => current,
    }
}
