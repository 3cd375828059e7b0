//! Types for transit-to-natal aspect search.

use chrono::NaiveDateTime;
use natal_chart::AspectType;
use natal_ephem::Body;
use serde::{Deserialize, Serialize};

/// A moment where a transiting body forms an exact aspect to a natal
/// position. `pass` numbers repeated exact hits of the same aspect in
/// chronological order; retrograde loops produce pass 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitAspectEvent {
    pub jd_ut: f64,
    pub utc: Option<NaiveDateTime>,
    pub transiting: Body,
    pub natal_body: Body,
    pub aspect: AspectType,
    pub longitude_deg: f64,
    pub speed_deg_per_day: Option<f64>,
    pub retrograde: bool,
    pub pass: u32,
}
