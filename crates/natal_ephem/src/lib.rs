//! Ephemeris provider contract consumed by the chart and search crates.
//!
//! The raw ephemeris (body positions from time, house cusps from time and
//! place) is an external capability: this crate defines only the seam.
//! A provider is constructed once at startup — owning whatever data files
//! or backend handles it needs — and passed by reference into every
//! computation call. Providers must be `Send + Sync` so a single handle
//! can serve concurrent year-scan workers.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The 12 tracked chart bodies.
///
/// Ten classical planets (Sun through Pluto), the mean lunar north node,
/// and Chiron as the minor body. The node and Chiron are chart points,
/// not pattern candidates — see [`CLASSICAL_BODIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    Chiron,
}

/// All 12 tracked bodies in chart order.
pub const ALL_BODIES: [Body; 12] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::NorthNode,
    Body::Chiron,
];

/// The 10 classical bodies used for geometric pattern detection
/// (excludes the lunar node and Chiron).
pub const CLASSICAL_BODIES: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

impl Body {
    /// Display name of the body.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::NorthNode => "North Node",
            Self::Chiron => "Chiron",
        }
    }

    /// 0-based index (Sun=0 .. Chiron=11).
    pub const fn index(self) -> u8 {
        match self {
            Self::Sun => 0,
            Self::Moon => 1,
            Self::Mercury => 2,
            Self::Venus => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
            Self::Pluto => 9,
            Self::NorthNode => 10,
            Self::Chiron => 11,
        }
    }

    /// Whether this body is one of the 10 classical pattern candidates.
    pub const fn is_classical(self) -> bool {
        !matches!(self, Self::NorthNode | Self::Chiron)
    }

    /// All tracked bodies in chart order.
    pub const fn all() -> &'static [Body; 12] {
        &ALL_BODIES
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ecliptic state of one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Geocentric ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Longitude rate in degrees per day; negative while retrograde.
    pub speed_deg_per_day: f64,
}

/// House system selector passed through to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HouseSystem {
    /// Placidus quadrant (time-based) houses — the default.
    #[default]
    Placidus,
    /// Whole-sign houses.
    WholeSign,
    /// Equal houses from the Ascendant.
    Equal,
}

/// Raw house computation output for one instant and place.
///
/// `cusps` is deliberately a `Vec` rather than a fixed array: the
/// downstream placement engine validates the count and treats anything
/// other than 12 as a fatal shape violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    /// Cusp longitudes in degrees [0, 360), house 1 first.
    pub cusps: Vec<f64>,
    /// Ascendant ecliptic longitude in degrees.
    pub ascendant_deg: f64,
    /// Midheaven (MC) ecliptic longitude in degrees.
    pub midheaven_deg: f64,
}

/// Errors surfaced by a provider implementation.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EphemerisError {
    /// A body or house lookup failed in the backend.
    Lookup(String),
    /// The provider does not implement the requested capability.
    Unsupported(&'static str),
    /// Requested epoch is outside the provider's data range.
    EpochOutOfRange { jd_ut: f64 },
    /// Provider was constructed with an invalid configuration.
    InvalidConfig(&'static str),
}

impl Display for EphemerisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lookup(msg) => write!(f, "ephemeris lookup failed: {msg}"),
            Self::Unsupported(msg) => write!(f, "unsupported ephemeris query: {msg}"),
            Self::EpochOutOfRange { jd_ut } => write!(f, "epoch out of range: JD {jd_ut}"),
            Self::InvalidConfig(msg) => write!(f, "invalid provider config: {msg}"),
        }
    }
}

impl Error for EphemerisError {}

/// External ephemeris capability.
///
/// Implementations own their backend state (data-file paths, caches);
/// construction happens once, queries are read-only and must be safe to
/// issue from multiple threads at once.
pub trait EphemerisProvider: Send + Sync {
    /// Ecliptic longitude and speed of `body` at `jd_ut`.
    fn body_position(&self, jd_ut: f64, body: Body) -> Result<BodyState, EphemerisError>;

    /// Twelve house cusps plus Ascendant/MC for an instant and place.
    fn houses(
        &self,
        jd_ut: f64,
        latitude_deg: f64,
        longitude_deg: f64,
        system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError>;
}
