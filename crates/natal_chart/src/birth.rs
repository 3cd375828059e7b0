//! Birth instant: local wall-clock time in an IANA timezone, resolved
//! once to a Julian Day on the UT scale.

use chrono::offset::LocalResult;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::ChartError;
use crate::julian::calendar_to_jd;

/// A birth date, time, and timezone as supplied by the caller.
///
/// Immutable, created per request; resolves to a Julian Day via
/// [`BirthInstant::to_julian_day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthInstant {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub zone: Tz,
}

impl BirthInstant {
    pub fn new(date: NaiveDate, time: NaiveTime, zone: Tz) -> Self {
        Self { date, time, zone }
    }

    /// Parse `"YYYY-MM-DD"`, `"HH:MM"` (or `"HH:MM:SS"`), and an IANA
    /// zone name. Any malformed field is a hard input error.
    pub fn parse(date: &str, time: &str, zone: &str) -> Result<Self, ChartError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ChartError::InvalidBirth(format!("date {date:?}: {e}")))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|e| ChartError::InvalidBirth(format!("time {time:?}: {e}")))?;
        let zone: Tz = zone
            .parse()
            .map_err(|_| ChartError::InvalidBirth(format!("unknown timezone {zone:?}")))?;
        Ok(Self { date, time, zone })
    }

    /// Resolve the local wall-clock instant to a Julian Day (UT).
    ///
    /// DST-ambiguous times resolve to the earlier offset; times skipped
    /// by a DST transition are errors.
    pub fn to_julian_day(&self) -> Result<f64, ChartError> {
        let local = self.date.and_time(self.time);
        let resolved = match self.zone.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                return Err(ChartError::InvalidBirth(format!(
                    "local time {local} does not exist in {}",
                    self.zone
                )));
            }
        };
        let utc = resolved.with_timezone(&Utc);
        let day = utc.day() as f64 + utc.num_seconds_from_midnight() as f64 / 86_400.0;
        Ok(calendar_to_jd(utc.year(), utc.month(), day))
    }
}
