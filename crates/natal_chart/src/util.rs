//! Shared angular arithmetic helpers.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 { r + 360.0 } else { r }
}

/// Normalize an angle to (-180, +180] degrees.
pub fn normalize_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Forward arc from `a` to `b` in degrees, always in [0, 360).
pub fn arc_forward(a: f64, b: f64) -> f64 {
    (b - a).rem_euclid(360.0)
}

/// Shortest angular separation between two longitudes, in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 { 360.0 - diff } else { diff }
}
