//! Error types for chart computation.

use std::error::Error;
use std::fmt::{Display, Formatter};

use natal_ephem::{Body, EphemerisError};

/// Errors from birth-chart computation.
///
/// Per-body and per-house provider failures are absorbed inside the
/// placement engine (logged, element omitted) and never surface here;
/// this enum covers hard input errors and structural violations only.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChartError {
    /// Error from the ephemeris provider that could not be absorbed.
    Ephemeris(EphemerisError),
    /// Malformed birth date/time or unrecognized IANA timezone.
    InvalidBirth(String),
    /// House computation reported success but returned a cusp count
    /// other than 12; downstream house mapping would be meaningless.
    ShapeViolation(&'static str),
    /// A required reference body is absent from the placements.
    MissingBody(Body),
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ephemeris(e) => write!(f, "ephemeris error: {e}"),
            Self::InvalidBirth(msg) => write!(f, "invalid birth data: {msg}"),
            Self::ShapeViolation(msg) => write!(f, "shape violation: {msg}"),
            Self::MissingBody(body) => write!(f, "missing body: {}", body.name()),
        }
    }
}

impl Error for ChartError {}

impl From<EphemerisError> for ChartError {
    fn from(e: EphemerisError) -> Self {
        Self::Ephemeris(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_birth() {
        let e = ChartError::InvalidBirth("bad zone".into());
        assert!(e.to_string().contains("bad zone"));
    }

    #[test]
    fn from_ephemeris() {
        let e: ChartError = EphemerisError::Unsupported("houses").into();
        assert!(matches!(e, ChartError::Ephemeris(_)));
    }

    #[test]
    fn display_missing_body() {
        let e = ChartError::MissingBody(Body::NorthNode);
        assert!(e.to_string().contains("North Node"));
    }
}
