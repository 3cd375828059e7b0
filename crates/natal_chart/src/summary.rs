//! Derived chart summary: balances, dominance rankings, chart ruler,
//! tightest aspects.

use serde::{Deserialize, Serialize};

use natal_ephem::Body;

use crate::aspects::AspectPlacement;
use crate::placement_types::Placements;
use crate::sign::{ALL_SIGNS, Element, Modality, Sign};

/// Body counts per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementBalance {
    pub fire: u32,
    pub earth: u32,
    pub air: u32,
    pub water: u32,
}

/// Body counts per modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalityBalance {
    pub cardinal: u32,
    pub fixed: u32,
    pub mutable: u32,
}

/// A sign with its dominance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignScore {
    pub sign: Sign,
    pub score: f64,
}

/// A body with its dominance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyScore {
    pub body: Body,
    pub score: f64,
}

/// Weighted summary statistics over a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSummary {
    pub element_balance: ElementBalance,
    pub modality_balance: ModalityBalance,
    /// Top 3 signs by dominance score, descending.
    pub dominant_signs: Vec<SignScore>,
    /// Top 3 bodies by dominance score, descending.
    pub dominant_bodies: Vec<BodyScore>,
    /// Traditional ruler of the Ascendant's sign; `None` without an
    /// Ascendant.
    pub chart_ruler: Option<Body>,
    /// The 10 tightest aspects, ascending by orb.
    pub top_aspects: Vec<AspectPlacement>,
}

/// Orb floor used in aspect-weight denominators.
const ORB_FLOOR: f64 = 0.25;

/// Houses counted as angular for body dominance.
const ANGULAR_HOUSES: [u8; 4] = [1, 4, 7, 10];

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Compute the derived summary for a chart.
pub fn derive_summary(placements: &Placements, aspects: &[AspectPlacement]) -> DerivedSummary {
    let ascendant_sign = placements.angles.ascendant.map(|a| a.sign);
    let chart_ruler = ascendant_sign.map(Sign::ruler);

    DerivedSummary {
        element_balance: element_balance(placements),
        modality_balance: modality_balance(placements),
        dominant_signs: dominant_signs(placements, aspects, ascendant_sign),
        dominant_bodies: dominant_bodies(placements, aspects, chart_ruler),
        chart_ruler,
        top_aspects: top_aspects(aspects),
    }
}

fn element_balance(placements: &Placements) -> ElementBalance {
    let mut balance = ElementBalance::default();
    for placement in &placements.bodies {
        match placement.sign.element() {
            Element::Fire => balance.fire += 1,
            Element::Earth => balance.earth += 1,
            Element::Air => balance.air += 1,
            Element::Water => balance.water += 1,
        }
    }
    balance
}

fn modality_balance(placements: &Placements) -> ModalityBalance {
    let mut balance = ModalityBalance::default();
    for placement in &placements.bodies {
        match placement.sign.modality() {
            Modality::Cardinal => balance.cardinal += 1,
            Modality::Fixed => balance.fixed += 1,
            Modality::Mutable => balance.mutable += 1,
        }
    }
    balance
}

/// Sign dominance: occupancy count, +2 for Sun/Moon/Ascendant sign,
/// plus `0.5 / max(orb, 0.25)` for every aspect touching a body in the
/// sign. Ties keep zodiacal order (stable sort).
fn dominant_signs(
    placements: &Placements,
    aspects: &[AspectPlacement],
    ascendant_sign: Option<Sign>,
) -> Vec<SignScore> {
    let mut scores: Vec<SignScore> = ALL_SIGNS
        .iter()
        .map(|&sign| {
            let occupants: Vec<_> = placements
                .bodies
                .iter()
                .filter(|p| p.sign == sign)
                .collect();

            let mut score = occupants.len() as f64;
            if occupants.iter().any(|p| p.body == Body::Sun) {
                score += 2.0;
            }
            if occupants.iter().any(|p| p.body == Body::Moon) {
                score += 2.0;
            }
            if ascendant_sign == Some(sign) {
                score += 2.0;
            }
            for occupant in &occupants {
                for aspect in aspects {
                    if aspect.touches(occupant.body) {
                        score += 0.5 / aspect.orb_deg.max(ORB_FLOOR);
                    }
                }
            }

            SignScore {
                sign,
                score: round2(score),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(3);
    scores
}

/// Body dominance: +2 for Sun, +2 for Moon, +2 for the chart ruler,
/// +1 for an angular house, plus `0.5 + 1 / max(orb, 0.25)` for every
/// aspect touching the body.
fn dominant_bodies(
    placements: &Placements,
    aspects: &[AspectPlacement],
    chart_ruler: Option<Body>,
) -> Vec<BodyScore> {
    let mut scores: Vec<BodyScore> = placements
        .bodies
        .iter()
        .map(|placement| {
            let mut score = 0.0;
            if placement.body == Body::Sun {
                score += 2.0;
            }
            if placement.body == Body::Moon {
                score += 2.0;
            }
            if chart_ruler == Some(placement.body) {
                score += 2.0;
            }
            if placement.house.is_some_and(|h| ANGULAR_HOUSES.contains(&h)) {
                score += 1.0;
            }
            for aspect in aspects {
                if aspect.touches(placement.body) {
                    score += 0.5 + 1.0 / aspect.orb_deg.max(ORB_FLOOR);
                }
            }

            BodyScore {
                body: placement.body,
                score: round2(score),
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(3);
    scores
}

fn top_aspects(aspects: &[AspectPlacement]) -> Vec<AspectPlacement> {
    let mut sorted = aspects.to_vec();
    sorted.sort_by(|a, b| a.orb_deg.total_cmp(&b.orb_deg));
    sorted.truncate(10);
    sorted
}
