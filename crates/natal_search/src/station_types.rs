//! Types for station search.

use chrono::NaiveDateTime;
use natal_chart::Sign;
use natal_ephem::Body;
use serde::{Deserialize, Serialize};

/// Direction of motion a body turns toward at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationDirection {
    /// Apparent speed passes from positive to negative.
    Retrograde,
    /// Apparent speed passes from negative to positive.
    Direct,
}

impl StationDirection {
    pub fn name(&self) -> &'static str {
        match self {
            StationDirection::Retrograde => "retrograde",
            StationDirection::Direct => "direct",
        }
    }
}

/// A moment where a body's apparent motion reverses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationEvent {
    pub jd_ut: f64,
    pub utc: Option<NaiveDateTime>,
    pub body: Body,
    pub direction: StationDirection,
    pub longitude_deg: f64,
    pub sign: Sign,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_names() {
        assert_eq!(StationDirection::Retrograde.name(), "retrograde");
        assert_eq!(StationDirection::Direct.name(), "direct");
    }
}
