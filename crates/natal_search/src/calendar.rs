//! Whole-year event calendars and batched natal transit sweeps.
//!
//! Each body is scanned on its own worker thread; the provider is
//! shared by reference, which is why `EphemerisProvider` requires
//! `Send + Sync`.

use std::thread;

use log::warn;
use natal_chart::{Placements, calendar_to_jd};
use natal_ephem::{ALL_BODIES, Body, EphemerisProvider};
use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::SearchError;
use crate::ingress::{search_ingresses, seasons_from_ingresses};
use crate::ingress_types::{IngressEvent, SeasonEvent};
use crate::station::search_stations;
use crate::station_types::StationEvent;
use crate::transit::search_transit_aspects;
use crate::transit_types::TransitAspectEvent;

/// UT Julian day bounds of a calendar year, `[jan 1 00:00, next jan 1 00:00)`.
pub fn year_span(year: i32) -> (f64, f64) {
    (
        calendar_to_jd(year, 1, 1.0),
        calendar_to_jd(year + 1, 1, 1.0),
    )
}

/// All sign ingresses, seasonal markers, and stations in one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearCalendar {
    pub year: i32,
    pub ingresses: Vec<IngressEvent>,
    pub seasons: Vec<SeasonEvent>,
    pub stations: Vec<StationEvent>,
}

/// Build the full event calendar for `year`, scanning each body on its
/// own thread. A body whose scan fails is logged and omitted rather
/// than sinking the whole calendar.
pub fn search_year_calendar(
    provider: &dyn EphemerisProvider,
    year: i32,
) -> Result<YearCalendar, SearchError> {
    let (jd_start, jd_end) = year_span(year);

    let mut ingresses: Vec<IngressEvent> = Vec::new();
    let mut stations: Vec<StationEvent> = Vec::new();

    let results = thread::scope(|scope| {
        let handles: Vec<_> = ALL_BODIES
            .iter()
            .map(|&body| {
                scope.spawn(move || {
                    let config = ScanConfig::for_body(body);
                    let ing = search_ingresses(provider, body, jd_start, jd_end, &config)?;
                    let sta = if matches!(body, Body::Sun | Body::Moon) {
                        Vec::new()
                    } else {
                        search_stations(provider, body, jd_start, jd_end, &config)?
                    };
                    Ok::<_, SearchError>((body, ing, sta))
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| SearchError::WorkerFailed("body scan panicked")))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for result in results {
        match result {
            Ok((_, ing, sta)) => {
                ingresses.extend(ing);
                stations.extend(sta);
            }
            Err(SearchError::Ephemeris(err)) => {
                warn!("calendar scan skipped a body: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    ingresses.sort_by(|a, b| a.jd_ut.total_cmp(&b.jd_ut));
    stations.sort_by(|a, b| a.jd_ut.total_cmp(&b.jd_ut));
    let seasons = seasons_from_ingresses(&ingresses);

    Ok(YearCalendar {
        year,
        ingresses,
        seasons,
        stations,
    })
}

/// Sweep every transiting body against every placed natal body over a
/// JD range, one worker thread per transiting body. Returned events
/// are globally sorted; pass numbers stay per (transiting, natal,
/// aspect) combination.
pub fn search_natal_transits(
    provider: &dyn EphemerisProvider,
    natal: &Placements,
    jd_start: f64,
    jd_end: f64,
) -> Result<Vec<TransitAspectEvent>, SearchError> {
    let natal_points: Vec<(Body, f64)> = natal
        .bodies
        .iter()
        .map(|p| (p.body, p.longitude_deg))
        .collect();

    let results = thread::scope(|scope| {
        let handles: Vec<_> = ALL_BODIES
            .iter()
            .map(|&transiting| {
                let points = &natal_points;
                scope.spawn(move || {
                    let config = ScanConfig::for_body(transiting);
                    let mut events = Vec::new();
                    for &(natal_body, natal_deg) in points {
                        events.extend(search_transit_aspects(
                            provider, transiting, natal_body, natal_deg, jd_start, jd_end, &config,
                        )?);
                    }
                    Ok::<_, SearchError>(events)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| SearchError::WorkerFailed("transit scan panicked")))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut events = Vec::new();
    for result in results {
        match result {
            Ok(batch) => events.extend(batch),
            Err(SearchError::Ephemeris(err)) => {
                warn!("transit scan skipped a body: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    events.sort_by(|a, b| a.jd_ut.total_cmp(&b.jd_ut));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_span_bounds() {
        let (start, end) = year_span(2000);
        // 2000-01-01 00:00 UT
        assert!((start - 2_451_544.5).abs() < 1e-9, "start = {start}");
        // Leap year: 366 days
        assert!((end - start - 366.0).abs() < 1e-9);

        let (s2, e2) = year_span(2001);
        assert!((s2 - end).abs() < 1e-9);
        assert!((e2 - s2 - 365.0).abs() < 1e-9);
    }
}
