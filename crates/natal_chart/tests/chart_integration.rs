//! End-to-end chart computation against a synthetic provider.

use std::collections::HashMap;

use natal_chart::{
    AspectType, BirthInstant, Body, BodyState, ChartError, EphemerisError, EphemerisProvider,
    HouseCusps, HouseSystem, Location, Sect, Sign, calculated_summary, compute_placements,
    derive_summary, detect_aspects,
};

/// Provider with fixed longitudes and evenly spaced cusps.
struct FixedProvider {
    positions: HashMap<Body, BodyState>,
    cusp_count: usize,
    fail_houses: bool,
    fail_bodies: Vec<Body>,
}

impl FixedProvider {
    fn new(positions: &[(Body, f64, f64)]) -> Self {
        Self {
            positions: positions
                .iter()
                .map(|&(body, longitude_deg, speed_deg_per_day)| {
                    (
                        body,
                        BodyState {
                            longitude_deg,
                            speed_deg_per_day,
                        },
                    )
                })
                .collect(),
            cusp_count: 12,
            fail_houses: false,
            fail_bodies: Vec::new(),
        }
    }
}

impl EphemerisProvider for FixedProvider {
    fn body_position(&self, _jd_ut: f64, body: Body) -> Result<BodyState, EphemerisError> {
        if self.fail_bodies.contains(&body) {
            return Err(EphemerisError::Lookup(format!("{body} unavailable")));
        }
        self.positions
            .get(&body)
            .copied()
            .ok_or_else(|| EphemerisError::Lookup(format!("{body} not in table")))
    }

    fn houses(
        &self,
        _jd_ut: f64,
        _latitude_deg: f64,
        _longitude_deg: f64,
        _system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError> {
        if self.fail_houses {
            return Err(EphemerisError::Lookup("house backend down".into()));
        }
        Ok(HouseCusps {
            cusps: (0..self.cusp_count).map(|i| i as f64 * 30.0).collect(),
            ascendant_deg: 0.0,
            midheaven_deg: 270.0,
        })
    }
}

fn standard_positions() -> Vec<(Body, f64, f64)> {
    vec![
        (Body::Sun, 15.0, 0.9856),
        (Body::Moon, 135.0, 13.18),
        (Body::Mercury, 20.0, -0.5),
        (Body::Venus, 50.0, 1.2),
        (Body::Mars, 255.0, 0.52),
        (Body::Jupiter, 100.0, 0.08),
        (Body::Saturn, 195.0, 0.03),
        (Body::Uranus, 310.0, 0.01),
        (Body::Neptune, 340.0, 0.006),
        (Body::Pluto, 250.0, 0.004),
        (Body::NorthNode, 80.0, -0.053),
        (Body::Chiron, 170.0, 0.02),
    ]
}

fn birth() -> BirthInstant {
    BirthInstant::parse("1990-06-15", "08:30", "Europe/Paris").unwrap()
}

#[test]
fn known_location_full_chart() {
    let provider = FixedProvider::new(&standard_positions());
    let location = Location::from_raw(48.8566, 2.3522);
    let placements =
        compute_placements(&provider, &birth(), location, HouseSystem::Placidus).unwrap();

    assert_eq!(placements.bodies.len(), 12);
    assert_eq!(placements.houses.len(), 12);
    assert!(placements.angles.ascendant.is_some());
    assert!(placements.angles.descendant.is_some());

    // Equal cusps from 0: Sun at 15 sits in house 1, sign Aries
    let sun = placements.body(Body::Sun).unwrap();
    assert_eq!(sun.sign, Sign::Aries);
    assert_eq!(sun.house, Some(1));
    assert!(!sun.retrograde);

    // Mercury has negative speed
    let mercury = placements.body(Body::Mercury).unwrap();
    assert!(mercury.retrograde);

    // Descendant = Asc + 180
    let desc = placements.angles.descendant.unwrap();
    assert!((desc.longitude_deg - 180.0).abs() < 1e-12);
}

#[test]
fn sentinel_location_gives_sign_only_chart() {
    let provider = FixedProvider::new(&standard_positions());
    let location = Location::from_raw(0.0, 0.0);
    assert_eq!(location, Location::Unknown);

    let placements =
        compute_placements(&provider, &birth(), location, HouseSystem::Placidus).unwrap();

    assert_eq!(placements.bodies.len(), 12);
    assert!(placements.houses.is_empty());
    assert!(placements.angles.ascendant.is_none());
    for body in &placements.bodies {
        assert!(body.house.is_none());
    }
    // Signs still resolve
    assert_eq!(placements.body(Body::Moon).unwrap().sign, Sign::Leo);
}

#[test]
fn house_failure_degrades_gracefully() {
    let mut provider = FixedProvider::new(&standard_positions());
    provider.fail_houses = true;
    let location = Location::from_raw(48.8566, 2.3522);

    let placements =
        compute_placements(&provider, &birth(), location, HouseSystem::Placidus).unwrap();
    assert_eq!(placements.bodies.len(), 12);
    assert!(placements.houses.is_empty());
    assert!(placements.angles.midheaven.is_none());
}

#[test]
fn body_failure_omits_body_only() {
    let mut provider = FixedProvider::new(&standard_positions());
    provider.fail_bodies = vec![Body::Chiron, Body::Pluto];

    let placements = compute_placements(
        &provider,
        &birth(),
        Location::from_raw(48.8566, 2.3522),
        HouseSystem::Placidus,
    )
    .unwrap();
    assert_eq!(placements.bodies.len(), 10);
    assert!(placements.body(Body::Chiron).is_none());
    assert!(placements.body(Body::Sun).is_some());
}

#[test]
fn wrong_cusp_count_is_fatal() {
    let mut provider = FixedProvider::new(&standard_positions());
    provider.cusp_count = 11;

    let err = compute_placements(
        &provider,
        &birth(),
        Location::from_raw(48.8566, 2.3522),
        HouseSystem::Placidus,
    )
    .unwrap_err();
    assert!(matches!(err, ChartError::ShapeViolation(_)));
}

#[test]
fn summary_pipeline_over_full_chart() {
    let provider = FixedProvider::new(&standard_positions());
    let placements = compute_placements(
        &provider,
        &birth(),
        Location::from_raw(48.8566, 2.3522),
        HouseSystem::Placidus,
    )
    .unwrap();

    let aspects = detect_aspects(&placements.bodies);
    // Sun (15) - Moon (135): 120 trine
    assert!(
        aspects
            .iter()
            .any(|a| a.aspect == AspectType::Trine
                && a.touches(Body::Sun)
                && a.touches(Body::Moon))
    );

    let summary = derive_summary(&placements, &aspects);
    // Ascendant at 0 -> Aries -> ruler Mars
    assert_eq!(summary.chart_ruler, Some(Body::Mars));
    assert_eq!(summary.dominant_signs.len(), 3);
    assert_eq!(summary.dominant_bodies.len(), 3);
    assert!(summary.top_aspects.len() <= 10);

    let features = calculated_summary(&placements, &aspects);
    // Sun in house 1 -> night chart
    assert_eq!(features.sect, Sect::Night);
    // North node at 80 -> south node at 260
    let node = features.south_node.unwrap();
    assert!((node.longitude_deg - 260.0).abs() < 1e-12);
    assert_eq!(node.house, Some(9));
    // Night fortune: asc(0) + sun(15) - moon(135) = -120 -> 240
    let fortune = features.fortune.unwrap();
    assert!((fortune.longitude_deg - 240.0).abs() < 1e-12);
    assert_eq!(fortune.sign, Sign::Sagittarius);
}
