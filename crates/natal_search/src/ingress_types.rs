//! Types for sign and season ingress search.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use natal_chart::Sign;
use natal_ephem::Body;

/// A body crossing into a new zodiac sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngressEvent {
    /// Event time as Julian Day (UT).
    pub jd_ut: f64,
    /// Derived UTC timestamp; `None` only for epochs outside the
    /// representable calendar range.
    pub utc: Option<NaiveDateTime>,
    pub body: Body,
    /// Sign occupied before the crossing.
    pub from_sign: Sign,
    /// Sign occupied after the crossing.
    pub to_sign: Sign,
    /// Boundary longitude crossed, in degrees [0, 360).
    pub longitude_deg: f64,
    /// Longitude speed at the crossing in degrees per day.
    pub speed_deg_per_day: Option<f64>,
    /// True when the boundary was crossed moving backward.
    pub retrograde: bool,
}

/// The four seasonal markers (Sun entering a cardinal sign).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl Season {
    /// Season opened by the Sun entering `sign`, if cardinal.
    pub const fn from_sign(sign: Sign) -> Option<Season> {
        match sign {
            Sign::Aries => Some(Self::MarchEquinox),
            Sign::Cancer => Some(Self::JuneSolstice),
            Sign::Libra => Some(Self::SeptemberEquinox),
            Sign::Capricorn => Some(Self::DecemberSolstice),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::MarchEquinox => "March Equinox",
            Self::JuneSolstice => "June Solstice",
            Self::SeptemberEquinox => "September Equinox",
            Self::DecemberSolstice => "December Solstice",
        }
    }
}

/// A seasonal ingress: the Sun entering a cardinal sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonEvent {
    pub season: Season,
    pub ingress: IngressEvent,
}
