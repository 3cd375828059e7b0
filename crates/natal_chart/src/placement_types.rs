//! Types for chart placements: location, body/house placements, angles.

use serde::{Deserialize, Serialize};

use natal_ephem::Body;

use crate::sign::Sign;

/// Geographic birth location.
///
/// The (0, 0) coordinate pair and non-finite values are sentinels for
/// "location unknown" and never treated as a real place — use
/// [`Location::from_raw`] at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Known {
        latitude_deg: f64,
        longitude_deg: f64,
    },
    Unknown,
}

impl Location {
    /// Interpret raw coordinates, mapping sentinels to `Unknown`.
    pub fn from_raw(latitude_deg: f64, longitude_deg: f64) -> Self {
        if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
            return Self::Unknown;
        }
        if latitude_deg == 0.0 && longitude_deg == 0.0 {
            return Self::Unknown;
        }
        if latitude_deg.abs() > 90.0 || longitude_deg.abs() > 180.0 {
            return Self::Unknown;
        }
        Self::Known {
            latitude_deg,
            longitude_deg,
        }
    }

    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }
}

/// One body's resolved chart position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPlacement {
    pub body: Body,
    pub sign: Sign,
    /// Ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Longitude rate in degrees per day.
    pub speed_deg_per_day: f64,
    /// House number 1-12; `None` when the location is unknown or house
    /// computation failed.
    pub house: Option<u8>,
    /// True iff the body's longitude speed is negative.
    pub retrograde: bool,
}

impl BodyPlacement {
    /// Degrees into the occupied sign, in [0, 30).
    pub fn degree_in_sign(&self) -> f64 {
        self.longitude_deg - self.sign.start_deg()
    }
}

/// One house cusp placement. Exactly 12 exist whenever houses are
/// computed at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousePlacement {
    /// House number 1-12.
    pub number: u8,
    /// Sign on the cusp.
    pub sign: Sign,
    /// Cusp longitude in degrees [0, 360).
    pub cusp_deg: f64,
}

/// A resolved chart angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    pub sign: Sign,
    pub longitude_deg: f64,
}

/// The four chart angles. All `None` when the location is unknown or
/// house computation failed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angles {
    pub ascendant: Option<Angle>,
    pub midheaven: Option<Angle>,
    pub descendant: Option<Angle>,
    pub imum_coeli: Option<Angle>,
}

/// Complete placement output for one birth chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placements {
    /// Julian Day (UT) the chart was cast for.
    pub jd_ut: f64,
    pub location: Location,
    /// Per-body placements; bodies whose provider lookup failed are
    /// absent.
    pub bodies: Vec<BodyPlacement>,
    /// Empty when houses were not computed; otherwise exactly 12.
    pub houses: Vec<HousePlacement>,
    pub angles: Angles,
}

impl Placements {
    /// Placement of a specific body, if it resolved.
    pub fn body(&self, body: Body) -> Option<&BodyPlacement> {
        self.bodies.iter().find(|p| p.body == body)
    }

    /// House cusp longitudes in order, when houses were computed.
    pub fn cusp_degrees(&self) -> Option<[f64; 12]> {
        if self.houses.len() != 12 {
            return None;
        }
        let mut cusps = [0.0; 12];
        for (i, house) in self.houses.iter().enumerate() {
            cusps[i] = house.cusp_deg;
        }
        Some(cusps)
    }
}
