//! Transit-to-natal aspect search.
//!
//! For each aspect the transiting body can make to a natal longitude
//! there are one or two target longitudes (conjunction and opposition
//! have one, the rest sit on either side of the natal point). Each
//! target is scanned for wrap-safe zero crossings of the signed offset
//! and refined with the bisection solver. Hits for an aspect are then
//! merged across its targets, sorted, and numbered as passes so that a
//! retrograde loop over the same degree reads as pass 1, 2, 3.

use natal_chart::{ASPECT_ORDER, AspectType, jd_to_utc, normalize_360, normalize_pm180};
use natal_ephem::{Body, EphemerisProvider};

use crate::config::ScanConfig;
use crate::error::SearchError;
use crate::solve::bracket_and_solve;
use crate::transit_types::TransitAspectEvent;

/// Crossings nearer than half a turn to the wrap seam are artifacts of
/// the discontinuity, not real hits.
const WRAP_GUARD_DEG: f64 = 90.0;

/// Two refined hits of the same target closer than this are the same
/// event seen twice by adjacent scan intervals.
const DUPLICATE_WINDOW_DAYS: f64 = 1.0;

/// Target longitudes at which `aspect` to `natal_deg` is exact.
fn aspect_targets(natal_deg: f64, aspect: AspectType) -> Vec<f64> {
    let angle = aspect.exact_angle();
    match aspect {
        AspectType::Conjunction => vec![normalize_360(natal_deg)],
        AspectType::Opposition => vec![normalize_360(natal_deg + 180.0)],
        _ => vec![
            normalize_360(natal_deg - angle),
            normalize_360(natal_deg + angle),
        ],
    }
}

/// Search all exact hits of `aspect` from `transiting` to the natal
/// position of `natal_body` at `natal_deg`, over `[jd_start, jd_end]`.
pub fn search_transit_aspect(
    provider: &dyn EphemerisProvider,
    transiting: Body,
    natal_body: Body,
    natal_deg: f64,
    aspect: AspectType,
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
) -> Result<Vec<TransitAspectEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }
    if !natal_deg.is_finite() {
        return Err(SearchError::InvalidConfig("natal longitude must be finite"));
    }

    let mut hits: Vec<(f64, f64)> = Vec::new();
    for target in aspect_targets(natal_deg, aspect) {
        scan_target(provider, transiting, target, jd_start, jd_end, config, &mut hits)?;
    }
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut events = Vec::with_capacity(hits.len());
    for (pass, (jd_ut, target)) in hits.into_iter().enumerate() {
        let state = provider.body_position(jd_ut, transiting)?;
        events.push(TransitAspectEvent {
            jd_ut,
            utc: jd_to_utc(jd_ut),
            transiting,
            natal_body,
            aspect,
            longitude_deg: target,
            speed_deg_per_day: Some(state.speed_deg_per_day),
            retrograde: state.speed_deg_per_day < 0.0,
            pass: pass as u32 + 1,
        });
    }
    Ok(events)
}

/// Search every aspect type from `transiting` to `natal_deg`, merged
/// and sorted chronologically. Pass numbers stay per-aspect.
pub fn search_transit_aspects(
    provider: &dyn EphemerisProvider,
    transiting: Body,
    natal_body: Body,
    natal_deg: f64,
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
) -> Result<Vec<TransitAspectEvent>, SearchError> {
    let mut events = Vec::new();
    for aspect in ASPECT_ORDER {
        events.extend(search_transit_aspect(
            provider, transiting, natal_body, natal_deg, aspect, jd_start, jd_end, config,
        )?);
    }
    events.sort_by(|a, b| a.jd_ut.total_cmp(&b.jd_ut));
    Ok(events)
}

/// Collect refined crossings of one target longitude into `hits` as
/// `(jd_ut, target)` pairs.
fn scan_target(
    provider: &dyn EphemerisProvider,
    transiting: Body,
    target: f64,
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
    hits: &mut Vec<(f64, f64)>,
) -> Result<(), SearchError> {
    let offset = |t: f64| -> Result<f64, SearchError> {
        let state = provider.body_position(t, transiting)?;
        Ok(normalize_pm180(state.longitude_deg - target))
    };

    let mut t_prev = jd_start;
    let mut f_prev = offset(t_prev)?;
    let mut last_hit: Option<f64> = None;

    loop {
        let t_curr = (t_prev + config.step_days).min(jd_end);
        let f_curr = offset(t_curr)?;

        if is_genuine_crossing(f_prev, f_curr) {
            let root = bracket_and_solve(
                &offset,
                t_prev,
                t_curr,
                0.0,
                config.precision_days,
                config.max_iterations,
            )?;
            if let Some(jd_ut) = root {
                let duplicate =
                    last_hit.is_some_and(|prev| (jd_ut - prev).abs() < DUPLICATE_WINDOW_DAYS);
                if !duplicate {
                    hits.push((jd_ut, target));
                    last_hit = Some(jd_ut);
                }
            }
        }

        if t_curr >= jd_end {
            break;
        }
        t_prev = t_curr;
        f_prev = f_curr;
    }

    Ok(())
}

/// A sign change in the offset is a real crossing only when both
/// samples sit well inside the same half-turn; a jump from near +180
/// to near -180 is the wrap seam, not the target.
fn is_genuine_crossing(f_prev: f64, f_curr: f64) -> bool {
    f_prev * f_curr < 0.0 && f_prev.abs() < WRAP_GUARD_DEG && f_curr.abs() < WRAP_GUARD_DEG
}
