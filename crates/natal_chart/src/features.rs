//! Calculated chart features: south node, sect, Part of Fortune,
//! emphasis/stelliums, and three-body geometric patterns.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use natal_ephem::Body;

use crate::aspects::{AspectPlacement, AspectType};
use crate::error::ChartError;
use crate::placement_types::{BodyPlacement, Placements};
use crate::placements::place_point;
use crate::sign::Sign;
use crate::util::normalize_360;

/// Day or night chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sect {
    Day,
    Night,
}

/// A derived point placed into sign and (when possible) house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPlacement {
    pub longitude_deg: f64,
    pub sign: Sign,
    pub house: Option<u8>,
}

/// Where a stellium sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StelliumLocus {
    Sign(Sign),
    House(u8),
}

/// A concentration of 3 or more bodies in one sign or house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stellium {
    pub locus: StelliumLocus,
    /// Member bodies, sorted by name for determinism.
    pub bodies: Vec<Body>,
}

/// Per-sign and per-house occupancy, sorted descending by count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    pub sign_counts: Vec<(Sign, u32)>,
    pub house_counts: Vec<(u8, u32)>,
    pub stelliums: Vec<Stellium>,
}

/// Three-body geometric pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternKind {
    GrandTrine,
    TSquare,
}

/// A detected three-body pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    /// The three bodies, sorted by name.
    pub bodies: [Body; 3],
}

/// All calculated features for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedSummary {
    /// Point opposite the north node; absent if the node did not
    /// resolve.
    pub south_node: Option<PointPlacement>,
    pub sect: Sect,
    /// Part of Fortune; absent when Ascendant, Sun, or Moon longitude
    /// is missing.
    pub fortune: Option<PointPlacement>,
    pub emphasis: Emphasis,
    pub patterns: Vec<Pattern>,
}

/// Compute all calculated features.
pub fn calculated_summary(
    placements: &Placements,
    aspects: &[AspectPlacement],
) -> CalculatedSummary {
    let sect = chart_sect(placements);
    CalculatedSummary {
        south_node: south_node_of(placements).ok(),
        sect,
        fortune: part_of_fortune(placements, sect),
        emphasis: compute_emphasis(placements),
        patterns: detect_patterns(&placements.bodies, aspects),
    }
}

/// Day chart iff the Sun occupies houses 7-12; night otherwise,
/// including when the Sun's house is unresolved.
pub fn chart_sect(placements: &Placements) -> Sect {
    match placements.body(Body::Sun).and_then(|p| p.house) {
        Some(house) if (7..=12).contains(&house) => Sect::Day,
        _ => Sect::Night,
    }
}

/// The point 180 degrees opposite the north node, placed into sign and
/// house with the chart's own cusps.
pub fn south_node_of(placements: &Placements) -> Result<PointPlacement, ChartError> {
    let node = placements
        .body(Body::NorthNode)
        .ok_or(ChartError::MissingBody(Body::NorthNode))?;
    Ok(opposite_point(node.longitude_deg, placements))
}

/// The symmetric point opposite any reference longitude.
pub fn opposite_point(reference_deg: f64, placements: &Placements) -> PointPlacement {
    let longitude_deg = normalize_360(reference_deg + 180.0);
    let (sign, house) = place_point(longitude_deg, placements);
    PointPlacement {
        longitude_deg,
        sign,
        house,
    }
}

/// Part of Fortune. Day formula `asc + moon - sun`, night formula
/// `asc + sun - moon`, normalized to [0, 360). Absent (not an error)
/// when any input longitude is missing.
pub fn part_of_fortune(placements: &Placements, sect: Sect) -> Option<PointPlacement> {
    let asc = placements.angles.ascendant?.longitude_deg;
    let sun = placements.body(Body::Sun)?.longitude_deg;
    let moon = placements.body(Body::Moon)?.longitude_deg;

    let raw = match sect {
        Sect::Day => asc + moon - sun,
        Sect::Night => asc + sun - moon,
    };
    let longitude_deg = normalize_360(raw);
    let (sign, house) = place_point(longitude_deg, placements);
    Some(PointPlacement {
        longitude_deg,
        sign,
        house,
    })
}

/// Occupancy counts per sign (all bodies) and per house (housed bodies
/// only), sorted descending, with 3+-body concentrations listed as
/// stelliums.
pub fn compute_emphasis(placements: &Placements) -> Emphasis {
    let mut by_sign: HashMap<Sign, Vec<Body>> = HashMap::new();
    let mut by_house: HashMap<u8, Vec<Body>> = HashMap::new();

    for placement in &placements.bodies {
        by_sign.entry(placement.sign).or_default().push(placement.body);
        if let Some(house) = placement.house {
            by_house.entry(house).or_default().push(placement.body);
        }
    }

    let mut sign_counts: Vec<(Sign, u32)> = by_sign
        .iter()
        .map(|(&sign, bodies)| (sign, bodies.len() as u32))
        .collect();
    sign_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.index().cmp(&b.0.index())));

    let mut house_counts: Vec<(u8, u32)> = by_house
        .iter()
        .map(|(&house, bodies)| (house, bodies.len() as u32))
        .collect();
    house_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut stelliums = Vec::new();
    for (sign, count) in &sign_counts {
        if *count >= 3 {
            let mut bodies = by_sign[sign].clone();
            bodies.sort_by_key(|b| b.name());
            stelliums.push(Stellium {
                locus: StelliumLocus::Sign(*sign),
                bodies,
            });
        }
    }
    for (house, count) in &house_counts {
        if *count >= 3 {
            let mut bodies = by_house[house].clone();
            bodies.sort_by_key(|b| b.name());
            stelliums.push(Stellium {
                locus: StelliumLocus::House(*house),
                bodies,
            });
        }
    }

    Emphasis {
        sign_counts,
        house_counts,
        stelliums,
    }
}

/// Detect grand trines and T-squares among the classical bodies.
///
/// Candidates are restricted to the 10 classical planets. Every
/// 3-combination is tested; a T-square is checked under all 3 rotations
/// of which pair holds the opposition. The (kind, sorted names) key
/// guarantees one entry per geometric triple.
pub fn detect_patterns(bodies: &[BodyPlacement], aspects: &[AspectPlacement]) -> Vec<Pattern> {
    let candidates: Vec<Body> = bodies
        .iter()
        .map(|p| p.body)
        .filter(|b| b.is_classical())
        .collect();

    let mut pair_aspects: HashMap<(Body, Body), AspectType> = HashMap::new();
    for aspect in aspects {
        pair_aspects.insert(pair_key(aspect.body_a, aspect.body_b), aspect.aspect);
    }
    let pair = |a: Body, b: Body| pair_aspects.get(&pair_key(a, b)).copied();

    let mut seen: BTreeSet<(PatternKind, [&'static str; 3])> = BTreeSet::new();
    let mut patterns = Vec::new();
    let mut push = |kind: PatternKind, triple: [Body; 3]| {
        let mut sorted = triple;
        sorted.sort_by_key(|b| b.name());
        let key = (kind, [sorted[0].name(), sorted[1].name(), sorted[2].name()]);
        if seen.insert(key) {
            patterns.push(Pattern {
                kind,
                bodies: sorted,
            });
        }
    };

    let n = candidates.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let (a, b, c) = (candidates[i], candidates[j], candidates[k]);
                let (ab, ac, bc) = (pair(a, b), pair(a, c), pair(b, c));

                if ab == Some(AspectType::Trine)
                    && ac == Some(AspectType::Trine)
                    && bc == Some(AspectType::Trine)
                {
                    push(PatternKind::GrandTrine, [a, b, c]);
                }

                // T-square: one opposition, and the apex body squares
                // both ends. Test all 3 rotations.
                let rotations = [(ab, ac, bc), (ac, ab, bc), (bc, ab, ac)];
                for (opposition, square_1, square_2) in rotations {
                    if opposition == Some(AspectType::Opposition)
                        && square_1 == Some(AspectType::Square)
                        && square_2 == Some(AspectType::Square)
                    {
                        push(PatternKind::TSquare, [a, b, c]);
                        break;
                    }
                }
            }
        }
    }

    patterns
}

fn pair_key(a: Body, b: Body) -> (Body, Body) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::detect_aspects;
    use crate::placement_types::{Angle, Angles, HousePlacement, Location};

    fn placement(body: Body, lon: f64, house: Option<u8>) -> BodyPlacement {
        BodyPlacement {
            body,
            sign: Sign::from_longitude(lon),
            longitude_deg: lon,
            speed_deg_per_day: 1.0,
            house,
            retrograde: false,
        }
    }

    fn chart(bodies: Vec<BodyPlacement>, ascendant: Option<f64>) -> Placements {
        let houses: Vec<HousePlacement> = if ascendant.is_some() {
            (0..12)
                .map(|i| HousePlacement {
                    number: i + 1,
                    sign: Sign::from_longitude(i as f64 * 30.0),
                    cusp_deg: i as f64 * 30.0,
                })
                .collect()
        } else {
            Vec::new()
        };
        let angles = match ascendant {
            Some(deg) => Angles {
                ascendant: Some(Angle {
                    sign: Sign::from_longitude(deg),
                    longitude_deg: deg,
                }),
                ..Default::default()
            },
            None => Angles::default(),
        };
        Placements {
            jd_ut: 2_451_545.0,
            location: Location::Unknown,
            bodies,
            houses,
            angles,
        }
    }

    #[test]
    fn south_node_is_opposite() {
        for reference in [0.0, 179.9, 350.0] {
            let placements = chart(vec![placement(Body::NorthNode, reference, None)], None);
            let node = south_node_of(&placements).unwrap();
            let expected = normalize_360(reference + 180.0);
            assert!(
                (node.longitude_deg - expected).abs() < 1e-12,
                "ref {reference}: got {}",
                node.longitude_deg
            );
        }
    }

    #[test]
    fn south_node_missing_reference() {
        let placements = chart(vec![placement(Body::Sun, 10.0, None)], None);
        assert!(matches!(
            south_node_of(&placements),
            Err(ChartError::MissingBody(Body::NorthNode))
        ));
    }

    #[test]
    fn sect_day_when_sun_above_horizon() {
        let placements = chart(vec![placement(Body::Sun, 10.0, Some(9))], None);
        assert_eq!(chart_sect(&placements), Sect::Day);
    }

    #[test]
    fn sect_night_when_sun_below_horizon() {
        let placements = chart(vec![placement(Body::Sun, 10.0, Some(3))], None);
        assert_eq!(chart_sect(&placements), Sect::Night);
    }

    #[test]
    fn sect_defaults_to_night_without_house() {
        let placements = chart(vec![placement(Body::Sun, 10.0, None)], None);
        assert_eq!(chart_sect(&placements), Sect::Night);
    }

    #[test]
    fn fortune_day_and_night_formulas() {
        let bodies = vec![
            placement(Body::Sun, 100.0, None),
            placement(Body::Moon, 200.0, None),
        ];
        let placements = chart(bodies, Some(10.0));
        let day = part_of_fortune(&placements, Sect::Day).unwrap();
        assert!((day.longitude_deg - 110.0).abs() < 1e-12, "{}", day.longitude_deg);
        let night = part_of_fortune(&placements, Sect::Night).unwrap();
        assert!(
            (night.longitude_deg - 270.0).abs() < 1e-12,
            "{}",
            night.longitude_deg
        );
    }

    #[test]
    fn fortune_absent_without_ascendant() {
        let bodies = vec![
            placement(Body::Sun, 100.0, None),
            placement(Body::Moon, 200.0, None),
        ];
        let placements = chart(bodies, None);
        assert!(part_of_fortune(&placements, Sect::Day).is_none());
    }

    #[test]
    fn fortune_absent_without_moon() {
        let placements = chart(vec![placement(Body::Sun, 100.0, None)], Some(10.0));
        assert!(part_of_fortune(&placements, Sect::Day).is_none());
    }

    #[test]
    fn stellium_in_sign() {
        let placements = chart(
            vec![
                placement(Body::Venus, 12.0, None),
                placement(Body::Sun, 5.0, None),
                placement(Body::Mercury, 20.0, None),
                placement(Body::Moon, 200.0, None),
            ],
            None,
        );
        let emphasis = compute_emphasis(&placements);
        assert_eq!(emphasis.sign_counts[0], (Sign::Aries, 3));
        assert_eq!(emphasis.stelliums.len(), 1);
        let stellium = &emphasis.stelliums[0];
        assert_eq!(stellium.locus, StelliumLocus::Sign(Sign::Aries));
        // Alphabetical member order
        assert_eq!(stellium.bodies, vec![Body::Mercury, Body::Sun, Body::Venus]);
    }

    #[test]
    fn house_counts_skip_unhoused() {
        let placements = chart(
            vec![
                placement(Body::Sun, 5.0, Some(1)),
                placement(Body::Moon, 10.0, None),
            ],
            None,
        );
        let emphasis = compute_emphasis(&placements);
        assert_eq!(emphasis.house_counts, vec![(1, 1)]);
    }

    #[test]
    fn grand_trine_single_entry() {
        let bodies = vec![
            placement(Body::Sun, 0.0, None),
            placement(Body::Moon, 120.0, None),
            placement(Body::Mars, 240.0, None),
        ];
        let aspects = detect_aspects(&bodies);
        let patterns = detect_patterns(&bodies, &aspects);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternKind::GrandTrine);
        assert_eq!(patterns[0].bodies, [Body::Mars, Body::Moon, Body::Sun]);
    }

    #[test]
    fn t_square_single_entry() {
        // Sun opposite Moon, Mars squares both (apex)
        let bodies = vec![
            placement(Body::Sun, 0.0, None),
            placement(Body::Moon, 180.0, None),
            placement(Body::Mars, 90.0, None),
        ];
        let aspects = detect_aspects(&bodies);
        let patterns = detect_patterns(&bodies, &aspects);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternKind::TSquare);
        assert_eq!(patterns[0].bodies, [Body::Mars, Body::Moon, Body::Sun]);
    }

    #[test]
    fn patterns_exclude_points() {
        // Node completing a "trine" triangle must not produce a pattern
        let bodies = vec![
            placement(Body::Sun, 0.0, None),
            placement(Body::Moon, 120.0, None),
            placement(Body::NorthNode, 240.0, None),
        ];
        let aspects = detect_aspects(&bodies);
        assert!(detect_patterns(&bodies, &aspects).is_empty());
    }

    #[test]
    fn no_pattern_from_partial_geometry() {
        // Opposition + one square is not a T-square
        let bodies = vec![
            placement(Body::Sun, 0.0, None),
            placement(Body::Moon, 180.0, None),
            placement(Body::Mars, 60.0, None),
        ];
        let aspects = detect_aspects(&bodies);
        let patterns = detect_patterns(&bodies, &aspects);
        assert!(patterns.is_empty(), "{patterns:?}");
    }

    #[test]
    fn calculated_summary_composes() {
        let bodies = vec![
            placement(Body::Sun, 100.0, Some(4)),
            placement(Body::Moon, 200.0, Some(7)),
            placement(Body::NorthNode, 40.0, Some(2)),
        ];
        let placements = chart(bodies, Some(10.0));
        let summary = calculated_summary(&placements, &[]);
        assert_eq!(summary.sect, Sect::Night);
        let node = summary.south_node.unwrap();
        assert!((node.longitude_deg - 220.0).abs() < 1e-12);
        // Night fortune: 10 + 100 - 200 = -90 -> 270
        let fortune = summary.fortune.unwrap();
        assert!((fortune.longitude_deg - 270.0).abs() < 1e-12);
        assert_eq!(fortune.house, Some(10));
    }
}
