//! Error types for event search.

use std::error::Error;
use std::fmt::{Display, Formatter};

use natal_ephem::EphemerisError;

/// Errors from event search.
///
/// An unbracketed root is not an error — every search returns
/// `Ok(None)` or an empty batch for intervals with no event.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// Error from the ephemeris provider.
    Ephemeris(EphemerisError),
    /// Invalid search configuration or range.
    InvalidConfig(&'static str),
    /// A parallel scan worker panicked.
    WorkerFailed(&'static str),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ephemeris(e) => write!(f, "ephemeris error: {e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::WorkerFailed(msg) => write!(f, "worker failed: {msg}"),
        }
    }
}

impl Error for SearchError {}

impl From<EphemerisError> for SearchError {
    fn from(e: EphemerisError) -> Self {
        Self::Ephemeris(e)
    }
}
