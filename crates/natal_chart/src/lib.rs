//! Natal chart computation: time normalization, placements, aspects,
//! derived summaries, and calculated features.
//!
//! This crate provides:
//! - Birth instant resolution (local wall clock + IANA zone -> Julian Day)
//! - Body/house/angle placement over an external ephemeris provider
//! - Aspect detection with fixed first-match classification
//! - Weighted dominance rankings, chart ruler, elemental/modal balance
//! - Sect, Part of Fortune, south node, stelliums, and 3-body patterns
//!
//! Raw ephemeris computation is out of scope; everything here runs
//! against the [`natal_ephem::EphemerisProvider`] seam.

pub mod aspects;
pub mod birth;
pub mod error;
pub mod features;
pub mod julian;
pub mod placement_types;
pub mod placements;
pub mod sign;
pub mod summary;
pub mod util;

pub use aspects::{
    ASPECT_ORDER, AspectPlacement, AspectType, classify_separation, detect_aspects,
};
pub use birth::BirthInstant;
pub use error::ChartError;
pub use features::{
    CalculatedSummary, Emphasis, Pattern, PatternKind, PointPlacement, Sect, Stellium,
    StelliumLocus, calculated_summary, chart_sect, compute_emphasis, detect_patterns,
    opposite_point, part_of_fortune, south_node_of,
};
pub use julian::{calendar_to_jd, jd_to_calendar, jd_to_utc};
pub use placement_types::{
    Angle, Angles, BodyPlacement, HousePlacement, Location, Placements,
};
pub use placements::{compute_placements, compute_placements_at, house_of, place_point};
pub use sign::{ALL_SIGNS, Element, Modality, Sign};
pub use summary::{
    BodyScore, DerivedSummary, ElementBalance, ModalityBalance, SignScore, derive_summary,
};
pub use util::{angular_separation, arc_forward, normalize_360, normalize_pm180};

// Re-export the provider contract so chart callers don't need to
// depend on natal_ephem directly.
pub use natal_ephem::{
    ALL_BODIES, Body, BodyState, CLASSICAL_BODIES, EphemerisError, EphemerisProvider, HouseCusps,
    HouseSystem,
};
