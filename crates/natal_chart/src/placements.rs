//! Placement engine: body, house, and angle placements for a birth chart.
//!
//! Per-body provider failures are logged and the body omitted; house
//! computation failure degrades the chart to sign-only. A successful
//! house computation that does not yield exactly 12 cusps is a fatal
//! shape violation.

use log::warn;

use natal_ephem::{ALL_BODIES, EphemerisProvider, HouseCusps, HouseSystem};

use crate::birth::BirthInstant;
use crate::error::ChartError;
use crate::placement_types::{Angle, Angles, BodyPlacement, HousePlacement, Location, Placements};
use crate::sign::Sign;
use crate::util::{arc_forward, normalize_360};

/// House number (1-12) containing `longitude_deg`, given the 12 cusp
/// longitudes as an ordered circular partition.
///
/// A longitude belongs to house `i` iff it falls in
/// `[cusp_i, cusp_{i+1})` going forward around the circle, with the
/// last segment wrapping through 360 -> 0.
pub fn house_of(longitude_deg: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_360(longitude_deg);
    for i in 0..12 {
        let start = cusps[i];
        let end = cusps[(i + 1) % 12];
        let span = arc_forward(start, end);
        let offset = arc_forward(start, lon);
        if offset < span {
            return (i + 1) as u8;
        }
    }
    // Only reachable on degenerate cusp data (duplicate cusps); the
    // longitude then sits on every boundary simultaneously.
    12
}

/// Compute all placements for a birth instant and location.
pub fn compute_placements(
    provider: &dyn EphemerisProvider,
    birth: &BirthInstant,
    location: Location,
    system: HouseSystem,
) -> Result<Placements, ChartError> {
    let jd_ut = birth.to_julian_day()?;
    compute_placements_at(provider, jd_ut, location, system)
}

/// Compute all placements for an already-resolved Julian Day.
pub fn compute_placements_at(
    provider: &dyn EphemerisProvider,
    jd_ut: f64,
    location: Location,
    system: HouseSystem,
) -> Result<Placements, ChartError> {
    let (houses, angles) = match location {
        Location::Known {
            latitude_deg,
            longitude_deg,
        } => match provider.houses(jd_ut, latitude_deg, longitude_deg, system) {
            Ok(raw) => {
                let (houses, angles) = resolve_houses(&raw)?;
                (houses, angles)
            }
            Err(e) => {
                warn!("house computation failed at JD {jd_ut}: {e}; continuing sign-only");
                (Vec::new(), Angles::default())
            }
        },
        Location::Unknown => (Vec::new(), Angles::default()),
    };

    let cusps = cusp_array(&houses);
    let mut bodies = Vec::with_capacity(ALL_BODIES.len());
    for body in ALL_BODIES {
        match provider.body_position(jd_ut, body) {
            Ok(state) => {
                let longitude_deg = normalize_360(state.longitude_deg);
                bodies.push(BodyPlacement {
                    body,
                    sign: Sign::from_longitude(longitude_deg),
                    longitude_deg,
                    speed_deg_per_day: state.speed_deg_per_day,
                    house: cusps.map(|c| house_of(longitude_deg, &c)),
                    retrograde: state.speed_deg_per_day < 0.0,
                });
            }
            Err(e) => {
                warn!("{} lookup failed at JD {jd_ut}: {e}; body omitted", body.name());
            }
        }
    }

    Ok(Placements {
        jd_ut,
        location,
        bodies,
        houses,
        angles,
    })
}

/// Validate raw cusp data and build house placements plus the four
/// angles. Descendant and IC are derived by 180-degree symmetry.
fn resolve_houses(raw: &HouseCusps) -> Result<(Vec<HousePlacement>, Angles), ChartError> {
    if raw.cusps.len() != 12 {
        return Err(ChartError::ShapeViolation(
            "house computation returned a cusp count other than 12",
        ));
    }

    let houses = raw
        .cusps
        .iter()
        .enumerate()
        .map(|(i, &cusp)| {
            let cusp_deg = normalize_360(cusp);
            HousePlacement {
                number: (i + 1) as u8,
                sign: Sign::from_longitude(cusp_deg),
                cusp_deg,
            }
        })
        .collect();

    let asc = normalize_360(raw.ascendant_deg);
    let mc = normalize_360(raw.midheaven_deg);
    let desc = normalize_360(asc + 180.0);
    let ic = normalize_360(mc + 180.0);

    let angle = |deg: f64| Angle {
        sign: Sign::from_longitude(deg),
        longitude_deg: deg,
    };

    let angles = Angles {
        ascendant: Some(angle(asc)),
        midheaven: Some(angle(mc)),
        descendant: Some(angle(desc)),
        imum_coeli: Some(angle(ic)),
    };

    Ok((houses, angles))
}

fn cusp_array(houses: &[HousePlacement]) -> Option<[f64; 12]> {
    if houses.len() != 12 {
        return None;
    }
    let mut cusps = [0.0; 12];
    for (i, house) in houses.iter().enumerate() {
        cusps[i] = house.cusp_deg;
    }
    Some(cusps)
}

/// Place an arbitrary longitude into sign and house using the chart's
/// cusps (if present). Used for derived points.
pub fn place_point(longitude_deg: f64, placements: &Placements) -> (Sign, Option<u8>) {
    let lon = normalize_360(longitude_deg);
    let house = placements.cusp_degrees().map(|c| house_of(lon, &c));
    (Sign::from_longitude(lon), house)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_cusps() -> [f64; 12] {
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = i as f64 * 30.0;
        }
        cusps
    }

    #[test]
    fn house_of_mid_first_house() {
        assert_eq!(house_of(15.0, &equal_cusps()), 1);
    }

    #[test]
    fn house_of_on_cusp_belongs_forward() {
        // Half-open [cusp_i, cusp_{i+1})
        assert_eq!(house_of(30.0, &equal_cusps()), 2);
        assert_eq!(house_of(0.0, &equal_cusps()), 1);
    }

    #[test]
    fn house_of_wrap_segment() {
        // House 12 spans 330 -> 360/0
        assert_eq!(house_of(359.0, &equal_cusps()), 12);
        assert_eq!(house_of(345.0, &equal_cusps()), 12);
    }

    #[test]
    fn house_of_shifted_cusps() {
        // Cusps starting at 200: house 1 spans [200, 230)
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = normalize_360(200.0 + i as f64 * 30.0);
        }
        assert_eq!(house_of(210.0, &cusps), 1);
        assert_eq!(house_of(10.0, &cusps), 6); // [350, 20) wraps
        assert_eq!(house_of(199.9, &cusps), 12);
    }

    #[test]
    fn resolve_houses_rejects_wrong_count() {
        let raw = HouseCusps {
            cusps: vec![0.0; 11],
            ascendant_deg: 0.0,
            midheaven_deg: 270.0,
        };
        assert!(matches!(
            resolve_houses(&raw),
            Err(ChartError::ShapeViolation(_))
        ));
    }

    #[test]
    fn resolve_houses_derives_desc_and_ic() {
        let raw = HouseCusps {
            cusps: equal_cusps().to_vec(),
            ascendant_deg: 10.0,
            midheaven_deg: 280.0,
        };
        let (houses, angles) = resolve_houses(&raw).unwrap();
        assert_eq!(houses.len(), 12);
        let desc = angles.descendant.unwrap();
        assert!((desc.longitude_deg - 190.0).abs() < 1e-12);
        assert_eq!(desc.sign, Sign::Libra);
        let ic = angles.imum_coeli.unwrap();
        assert!((ic.longitude_deg - 100.0).abs() < 1e-12);
    }

    #[test]
    fn resolve_houses_normalizes_angles() {
        let raw = HouseCusps {
            cusps: equal_cusps().to_vec(),
            ascendant_deg: 350.0,
            midheaven_deg: 300.0,
        };
        let (_, angles) = resolve_houses(&raw).unwrap();
        let desc = angles.descendant.unwrap();
        assert!((desc.longitude_deg - 170.0).abs() < 1e-12);
    }
}
