//! Aspect detection between placed bodies.
//!
//! Each unordered pair's shortest angular separation is tested against
//! the aspect definitions in a fixed order, and the first match wins.
//! That first-match order is the deterministic tie-break where
//! tolerance windows could overlap at their boundaries; changing it
//! changes classification outcomes, so it is part of the contract.

use serde::{Deserialize, Serialize};

use natal_ephem::Body;

use crate::placement_types::BodyPlacement;
use crate::util::angular_separation;

/// The five major aspect types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

/// Classification order. First match wins; do not reorder.
pub const ASPECT_ORDER: [AspectType; 5] = [
    AspectType::Conjunction,
    AspectType::Sextile,
    AspectType::Square,
    AspectType::Trine,
    AspectType::Opposition,
];

impl AspectType {
    /// Exact defining angle in degrees.
    pub const fn exact_angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    /// Maximum orb (deviation from exact) in degrees.
    pub const fn max_orb(self) -> f64 {
        match self {
            Self::Conjunction => 8.0,
            Self::Sextile => 6.0,
            Self::Square => 6.0,
            Self::Trine => 7.0,
            Self::Opposition => 8.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "Conjunction",
            Self::Sextile => "Sextile",
            Self::Square => "Square",
            Self::Trine => "Trine",
            Self::Opposition => "Opposition",
        }
    }
}

impl std::fmt::Display for AspectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A detected aspect between an unordered body pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectPlacement {
    pub body_a: Body,
    pub body_b: Body,
    pub aspect: AspectType,
    /// Deviation from the exact angle, in degrees; never exceeds the
    /// aspect type's tolerance.
    pub orb_deg: f64,
    /// Shortest angular separation of the pair, in [0, 180].
    pub separation_deg: f64,
}

impl AspectPlacement {
    /// Whether this aspect involves the given body.
    pub fn touches(&self, body: Body) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// Classify a single separation, if it matches any aspect.
pub fn classify_separation(separation_deg: f64) -> Option<(AspectType, f64)> {
    for aspect in ASPECT_ORDER {
        let orb = (separation_deg - aspect.exact_angle()).abs();
        if orb <= aspect.max_orb() {
            return Some((aspect, orb));
        }
    }
    None
}

/// Detect all aspects among the placed bodies.
pub fn detect_aspects(bodies: &[BodyPlacement]) -> Vec<AspectPlacement> {
    let mut aspects = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let separation_deg = angular_separation(a.longitude_deg, b.longitude_deg);
            if let Some((aspect, orb_deg)) = classify_separation(separation_deg) {
                aspects.push(AspectPlacement {
                    body_a: a.body,
                    body_b: b.body,
                    aspect,
                    orb_deg,
                    separation_deg,
                });
            }
        }
    }
    aspects
}
