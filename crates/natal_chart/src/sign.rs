//! Zodiac signs, elements, modalities, and traditional rulership.
//!
//! The ecliptic is divided into 12 equal signs of 30 degrees starting
//! from Aries at 0 degrees. Element, modality, and traditional ruler
//! assignments are the universal Western conventions.

use serde::{Deserialize, Serialize};

use natal_ephem::Body;

use crate::util::normalize_360;

/// The 12 zodiac signs starting from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in zodiacal order (0 = Aries .. 11 = Pisces).
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

/// The four elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// The three modalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Sign {
    /// Name of the sign.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based index (Aries=0 .. Pisces=11).
    pub const fn index(self) -> u8 {
        match self {
            Self::Aries => 0,
            Self::Taurus => 1,
            Self::Gemini => 2,
            Self::Cancer => 3,
            Self::Leo => 4,
            Self::Virgo => 5,
            Self::Libra => 6,
            Self::Scorpio => 7,
            Self::Sagittarius => 8,
            Self::Capricorn => 9,
            Self::Aquarius => 10,
            Self::Pisces => 11,
        }
    }

    /// Sign from a 0-based index, wrapping modulo 12.
    pub const fn from_index(index: u8) -> Sign {
        ALL_SIGNS[(index % 12) as usize]
    }

    /// Sign containing an ecliptic longitude (30-degree bands from Aries 0).
    pub fn from_longitude(longitude_deg: f64) -> Sign {
        let lon = normalize_360(longitude_deg);
        Self::from_index((lon / 30.0).floor() as u8)
    }

    /// Ecliptic longitude of the sign's start boundary.
    pub const fn start_deg(self) -> f64 {
        self.index() as f64 * 30.0
    }

    /// The sign 180 degrees opposite.
    pub const fn opposite(self) -> Sign {
        Self::from_index(self.index() + 6)
    }

    /// Element of the sign.
    pub const fn element(self) -> Element {
        match self {
            Self::Aries | Self::Leo | Self::Sagittarius => Element::Fire,
            Self::Taurus | Self::Virgo | Self::Capricorn => Element::Earth,
            Self::Gemini | Self::Libra | Self::Aquarius => Element::Air,
            Self::Cancer | Self::Scorpio | Self::Pisces => Element::Water,
        }
    }

    /// Modality of the sign.
    pub const fn modality(self) -> Modality {
        match self {
            Self::Aries | Self::Cancer | Self::Libra | Self::Capricorn => Modality::Cardinal,
            Self::Taurus | Self::Leo | Self::Scorpio | Self::Aquarius => Modality::Fixed,
            Self::Gemini | Self::Virgo | Self::Sagittarius | Self::Pisces => Modality::Mutable,
        }
    }

    /// Traditional planetary ruler of the sign.
    pub const fn ruler(self) -> Body {
        match self {
            Self::Aries => Body::Mars,
            Self::Taurus => Body::Venus,
            Self::Gemini => Body::Mercury,
            Self::Cancer => Body::Moon,
            Self::Leo => Body::Sun,
            Self::Virgo => Body::Mercury,
            Self::Libra => Body::Venus,
            Self::Scorpio => Body::Mars,
            Self::Sagittarius => Body::Jupiter,
            Self::Capricorn => Body::Saturn,
            Self::Aquarius => Body::Saturn,
            Self::Pisces => Body::Jupiter,
        }
    }

    /// Whether this is a cardinal (season-opening) sign.
    pub const fn is_cardinal(self) -> bool {
        matches!(self.modality(), Modality::Cardinal)
    }

    /// All 12 signs in order.
    pub const fn all() -> &'static [Sign; 12] {
        &ALL_SIGNS
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Element {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Air => "Air",
            Self::Water => "Water",
        }
    }
}

impl Modality {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cardinal => "Cardinal",
            Self::Fixed => "Fixed",
            Self::Mutable => "Mutable",
        }
    }
}
