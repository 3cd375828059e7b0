//! Station search: moments where a body's apparent speed crosses zero.
//!
//! The Sun and Moon never station, so requests for them are rejected
//! up front rather than scanned fruitlessly.

use natal_chart::{Sign, jd_to_utc};
use natal_ephem::{Body, EphemerisProvider};

use crate::config::ScanConfig;
use crate::error::SearchError;
use crate::solve::bracket_and_solve;
use crate::station_types::{StationDirection, StationEvent};

/// Maximum forward scan for `next_station`, in days. Every station-capable
/// body stations at least once within this window.
const MAX_SCAN_DAYS: f64 = 800.0;

fn check_body(body: Body) -> Result<(), SearchError> {
    match body {
        Body::Sun | Body::Moon => Err(SearchError::InvalidConfig(
            "body never stations (apparent speed does not change sign)",
        )),
        _ => Ok(()),
    }
}

/// Search all stations of `body` in `[jd_start, jd_end]`.
pub fn search_stations(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
) -> Result<Vec<StationEvent>, SearchError> {
    check_body(body)?;
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let mut events = Vec::new();
    let mut t_prev = jd_start;
    let mut speed_prev = provider.body_position(t_prev, body)?.speed_deg_per_day;

    loop {
        let t_curr = (t_prev + config.step_days).min(jd_end);
        let speed_curr = provider.body_position(t_curr, body)?.speed_deg_per_day;

        if let Some(event) =
            refine_station(provider, body, t_prev, speed_prev, t_curr, speed_curr, config)?
        {
            events.push(event);
        }

        if t_curr >= jd_end {
            break;
        }
        t_prev = t_curr;
        speed_prev = speed_curr;
    }

    Ok(events)
}

/// Find the next station of `body` after `jd_ut`.
pub fn next_station(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_ut: f64,
    config: &ScanConfig,
) -> Result<Option<StationEvent>, SearchError> {
    check_body(body)?;
    config.validate().map_err(SearchError::InvalidConfig)?;

    let max_steps = (MAX_SCAN_DAYS / config.step_days).ceil() as usize;
    let mut t_prev = jd_ut;
    let mut speed_prev = provider.body_position(t_prev, body)?.speed_deg_per_day;

    for _ in 0..max_steps {
        let t_curr = t_prev + config.step_days;
        let speed_curr = provider.body_position(t_curr, body)?.speed_deg_per_day;

        if let Some(event) =
            refine_station(provider, body, t_prev, speed_prev, t_curr, speed_curr, config)?
        {
            return Ok(Some(event));
        }

        t_prev = t_curr;
        speed_prev = speed_curr;
    }

    Ok(None)
}

fn refine_station(
    provider: &dyn EphemerisProvider,
    body: Body,
    t_prev: f64,
    speed_prev: f64,
    t_curr: f64,
    speed_curr: f64,
    config: &ScanConfig,
) -> Result<Option<StationEvent>, SearchError> {
    if speed_prev == 0.0 || speed_prev.signum() == speed_curr.signum() {
        return Ok(None);
    }

    let speed_at = |t: f64| -> Result<f64, SearchError> {
        Ok(provider.body_position(t, body)?.speed_deg_per_day)
    };

    let root = bracket_and_solve(
        &speed_at,
        t_prev,
        t_curr,
        0.0,
        config.precision_days,
        config.max_iterations,
    )?;

    let Some(jd_ut) = root else {
        return Ok(None);
    };

    // Direction is what the body turns toward, read off the incoming sign.
    let direction = if speed_prev > 0.0 {
        StationDirection::Retrograde
    } else {
        StationDirection::Direct
    };

    let state = provider.body_position(jd_ut, body)?;
    Ok(Some(StationEvent {
        jd_ut,
        utc: jd_to_utc(jd_ut),
        body,
        direction,
        longitude_deg: state.longitude_deg,
        sign: Sign::from_longitude(state.longitude_deg),
    }))
}
