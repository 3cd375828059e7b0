//! Generic root-finder: bracket detection + binary search.
//!
//! Reused for every event family: sign ingresses solve a wrap-aware
//! angular difference, stations solve the speed function, transits
//! solve the separation to a fixed target. "No root bracketed" is the
//! expected outcome for most scanned intervals and is reported as
//! `Ok(None)`, never as an error.

use crate::error::SearchError;

/// Find a root of `f(t) = target` in `[low, high]` by bisection.
///
/// Returns `Ok(None)` when `f(low)` and `f(high)` sit on the same side
/// of the target (no root bracketed). Otherwise halves the interval
/// toward whichever side preserves the sign change, for up to
/// `max_iterations` or until the interval width drops below
/// `precision`.
pub fn bracket_and_solve<F>(
    f: &F,
    low: f64,
    high: f64,
    target: f64,
    precision: f64,
    max_iterations: u32,
) -> Result<Option<f64>, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    let f_low = f(low)? - target;
    let f_high = f(high)? - target;

    if f_low == 0.0 {
        return Ok(Some(low));
    }
    if f_high == 0.0 {
        return Ok(Some(high));
    }
    if f_low * f_high > 0.0 {
        return Ok(None);
    }

    let mut t_a = low;
    let mut f_a = f_low;
    let mut t_b = high;

    for _ in 0..max_iterations {
        let t_mid = 0.5 * (t_a + t_b);
        let f_mid = f(t_mid)? - target;

        if f_a * f_mid <= 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }

        if (t_b - t_a).abs() < precision {
            break;
        }
    }

    Ok(Some(0.5 * (t_a + t_b)))
}
