//! Sign ingress and season ingress search.
//!
//! Coarse scan over the range at the configured cadence; whenever the
//! occupied sign differs between consecutive samples, the crossed
//! boundary longitude is derived from the crossing direction (forward
//! crossings enter at the new sign's start, retrograde crossings fall
//! back across the previous sign's start), then the exact instant is
//! refined with the root-finder on a wrap-aware angular difference.

use natal_chart::{Sign, jd_to_utc, normalize_pm180};
use natal_ephem::{Body, EphemerisProvider};

use crate::config::ScanConfig;
use crate::error::SearchError;
use crate::ingress_types::{IngressEvent, Season, SeasonEvent};
use crate::solve::bracket_and_solve;

/// Maximum forward scan for `next_ingress`, in days. Covers the longest
/// single-sign residency (Pluto, ~32 years).
const MAX_SCAN_DAYS: f64 = 20_000.0;

/// Search all sign ingresses of `body` in `[jd_start, jd_end]`.
pub fn search_ingresses(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
) -> Result<Vec<IngressEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    if jd_end <= jd_start {
        return Err(SearchError::InvalidConfig("jd_end must be after jd_start"));
    }

    let mut events = Vec::new();
    let mut t_prev = jd_start;
    let mut lon_prev = provider.body_position(t_prev, body)?.longitude_deg;

    loop {
        let t_curr = (t_prev + config.step_days).min(jd_end);
        let lon_curr = provider.body_position(t_curr, body)?.longitude_deg;

        if let Some(event) =
            refine_crossing(provider, body, t_prev, lon_prev, t_curr, lon_curr, config)?
        {
            events.push(event);
        }

        if t_curr >= jd_end {
            break;
        }
        t_prev = t_curr;
        lon_prev = lon_curr;
    }

    Ok(events)
}

/// Find the next sign ingress of `body` after `jd_ut`.
pub fn next_ingress(
    provider: &dyn EphemerisProvider,
    body: Body,
    jd_ut: f64,
    config: &ScanConfig,
) -> Result<Option<IngressEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let max_steps = (MAX_SCAN_DAYS / config.step_days).ceil() as usize;
    let mut t_prev = jd_ut;
    let mut lon_prev = provider.body_position(t_prev, body)?.longitude_deg;

    for _ in 0..max_steps {
        let t_curr = t_prev + config.step_days;
        let lon_curr = provider.body_position(t_curr, body)?.longitude_deg;

        if let Some(event) =
            refine_crossing(provider, body, t_prev, lon_prev, t_curr, lon_curr, config)?
        {
            return Ok(Some(event));
        }

        t_prev = t_curr;
        lon_prev = lon_curr;
    }

    Ok(None)
}

/// If the occupied sign differs between the two samples, refine the
/// boundary crossing between them.
fn refine_crossing(
    provider: &dyn EphemerisProvider,
    body: Body,
    t_prev: f64,
    lon_prev: f64,
    t_curr: f64,
    lon_curr: f64,
    config: &ScanConfig,
) -> Result<Option<IngressEvent>, SearchError> {
    let from_sign = Sign::from_longitude(lon_prev);
    let to_sign = Sign::from_longitude(lon_curr);
    if from_sign == to_sign {
        return Ok(None);
    }

    // Forward motion crosses into the new sign at its start boundary;
    // retrograde motion falls back across the previous sign's start.
    let forward = normalize_pm180(lon_curr - lon_prev) >= 0.0;
    let boundary = if forward {
        to_sign.start_deg()
    } else {
        from_sign.start_deg()
    };

    let delta = |t: f64| -> Result<f64, SearchError> {
        let state = provider.body_position(t, body)?;
        Ok(normalize_pm180(state.longitude_deg - boundary))
    };

    let root = bracket_and_solve(
        &delta,
        t_prev,
        t_curr,
        0.0,
        config.precision_days,
        config.max_iterations,
    )?;

    let Some(jd_ut) = root else {
        return Ok(None);
    };

    let state = provider.body_position(jd_ut, body)?;
    Ok(Some(IngressEvent {
        jd_ut,
        utc: jd_to_utc(jd_ut),
        body,
        from_sign,
        to_sign,
        longitude_deg: boundary,
        speed_deg_per_day: Some(state.speed_deg_per_day),
        retrograde: state.speed_deg_per_day < 0.0,
    }))
}

/// Search the Sun's seasonal ingresses (equinoxes and solstices) in
/// `[jd_start, jd_end]`.
pub fn search_seasons(
    provider: &dyn EphemerisProvider,
    jd_start: f64,
    jd_end: f64,
    config: &ScanConfig,
) -> Result<Vec<SeasonEvent>, SearchError> {
    let ingresses = search_ingresses(provider, Body::Sun, jd_start, jd_end, config)?;
    Ok(seasons_from_ingresses(&ingresses))
}

/// Filter a batch of Sun ingresses down to the cardinal-sign crossings.
pub fn seasons_from_ingresses(ingresses: &[IngressEvent]) -> Vec<SeasonEvent> {
    ingresses
        .iter()
        .filter(|e| e.body == Body::Sun)
        .filter_map(|&ingress| {
            Season::from_sign(ingress.to_sign).map(|season| SeasonEvent { season, ingress })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use natal_ephem::{BodyState, EphemerisError, HouseCusps, HouseSystem};

    /// Body moving at a constant rate from a base longitude at t = 0.
    struct LinearProvider {
        base_deg: f64,
        rate_deg_per_day: f64,
    }

    impl EphemerisProvider for LinearProvider {
        fn body_position(&self, jd_ut: f64, _body: Body) -> Result<BodyState, EphemerisError> {
            Ok(BodyState {
                longitude_deg: (self.base_deg + self.rate_deg_per_day * jd_ut).rem_euclid(360.0),
                speed_deg_per_day: self.rate_deg_per_day,
            })
        }

        fn houses(
            &self,
            _jd_ut: f64,
            _lat: f64,
            _lon: f64,
            _system: HouseSystem,
        ) -> Result<HouseCusps, EphemerisError> {
            Err(EphemerisError::Unsupported("houses"))
        }
    }

    #[test]
    fn forward_crossing_found() {
        // Starts at 25 deg, 1 deg/day: enters Taurus (30 deg) at t = 5
        let provider = LinearProvider {
            base_deg: 25.0,
            rate_deg_per_day: 1.0,
        };
        let events =
            search_ingresses(&provider, Body::Sun, 0.0, 10.0, &ScanConfig::default()).unwrap();
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert!((e.jd_ut - 5.0).abs() < 1e-4, "jd = {}", e.jd_ut);
        assert_eq!(e.from_sign, Sign::Aries);
        assert_eq!(e.to_sign, Sign::Taurus);
        assert!((e.longitude_deg - 30.0).abs() < 1e-9);
        assert!(!e.retrograde);
    }

    #[test]
    fn retrograde_crossing_uses_previous_sign_start() {
        // Starts at 32 deg moving backward: falls into Aries across 30
        let provider = LinearProvider {
            base_deg: 32.0,
            rate_deg_per_day: -0.5,
        };
        let events =
            search_ingresses(&provider, Body::Mercury, 0.0, 10.0, &ScanConfig::default()).unwrap();
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert!((e.jd_ut - 4.0).abs() < 1e-4, "jd = {}", e.jd_ut);
        assert_eq!(e.from_sign, Sign::Taurus);
        assert_eq!(e.to_sign, Sign::Aries);
        assert!((e.longitude_deg - 30.0).abs() < 1e-9);
        assert!(e.retrograde);
    }

    #[test]
    fn wrap_crossing_at_aries_point() {
        // Starts at 358 deg: crosses 360 -> 0 into Aries at t = 2
        let provider = LinearProvider {
            base_deg: 358.0,
            rate_deg_per_day: 1.0,
        };
        let events =
            search_ingresses(&provider, Body::Sun, 0.0, 5.0, &ScanConfig::default()).unwrap();
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert!((e.jd_ut - 2.0).abs() < 1e-4, "jd = {}", e.jd_ut);
        assert_eq!(e.from_sign, Sign::Pisces);
        assert_eq!(e.to_sign, Sign::Aries);
        assert!((e.longitude_deg - 0.0).abs() < 1e-9);
    }

    #[test]
    fn multiple_crossings_in_range() {
        // 12 deg/day crosses a boundary every 2.5 days
        let provider = LinearProvider {
            base_deg: 0.0,
            rate_deg_per_day: 12.0,
        };
        let config = ScanConfig::for_body(Body::Moon);
        let events = search_ingresses(&provider, Body::Moon, 0.0, 30.0, &config).unwrap();
        assert_eq!(events.len(), 12, "{events:?}");
        for pair in events.windows(2) {
            assert!(pair[0].jd_ut < pair[1].jd_ut);
        }
    }

    #[test]
    fn next_ingress_scans_forward() {
        let provider = LinearProvider {
            base_deg: 25.0,
            rate_deg_per_day: 1.0,
        };
        let event = next_ingress(&provider, Body::Sun, 0.0, &ScanConfig::default())
            .unwrap()
            .unwrap();
        assert!((event.jd_ut - 5.0).abs() < 1e-4);
    }

    #[test]
    fn seasons_filter_cardinal_only() {
        // Sun-speed motion through a full year's worth of longitude
        let provider = LinearProvider {
            base_deg: 0.0,
            rate_deg_per_day: 360.0 / 365.25,
        };
        let config = ScanConfig::for_body(Body::Sun);
        let seasons = search_seasons(&provider, 0.0, 365.25, &config).unwrap();
        assert_eq!(seasons.len(), 4, "{seasons:?}");
        assert_eq!(seasons[0].season, Season::JuneSolstice);
        assert_eq!(seasons[1].season, Season::SeptemberEquinox);
        assert_eq!(seasons[2].season, Season::DecemberSolstice);
        assert_eq!(seasons[3].season, Season::MarchEquinox);
    }

    #[test]
    fn rejects_inverted_range() {
        let provider = LinearProvider {
            base_deg: 0.0,
            rate_deg_per_day: 1.0,
        };
        assert!(
            search_ingresses(&provider, Body::Sun, 10.0, 5.0, &ScanConfig::default()).is_err()
        );
    }

    #[test]
    fn timestamps_derived_for_real_epochs() {
        let provider = LinearProvider {
            base_deg: 25.0,
            rate_deg_per_day: 1.0,
        };
        // Scan across J2000 so the refined JD has a calendar form
        let events = search_ingresses(
            &provider,
            Body::Sun,
            2_451_540.0,
            2_451_550.0,
            &ScanConfig::default(),
        )
        .unwrap();
        assert!(!events.is_empty());
        assert!(events[0].utc.is_some());
    }
}
