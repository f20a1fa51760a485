//! Local airport-frame geometry.
//!
//! Positions are metres in a flat local frame (`x` east, `y` north, `z` up).
//! Airport surfaces are small enough that projecting geodetic input onto a
//! tangent plane is the ingestion layer's job; the core never sees lat/lon.
//!
//! Headings are degrees clockwise from north (+y), normalised to `[0, 360)`.

/// A point in the local airport frame, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in metres (3-D).
    pub fn distance_m(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Compass heading from `self` towards `other`.  Returns `0.0` for
    /// coincident points.
    pub fn heading_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        normalize_heading(dx.atan2(dy).to_degrees())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Wrap any angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs due to rounding.
    if h >= 360.0 { 0.0 } else { h }
}

/// Signed shortest turn from `from` to `to`, in `(-180, 180]`.
pub fn heading_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Blend two headings along the shortest arc.  `t = 0` gives `from`,
/// `t = 1` gives `to`.
pub fn blend_heading(from: f64, to: f64, t: f64) -> f64 {
    normalize_heading(from + heading_delta(from, to) * t.clamp(0.0, 1.0))
}
