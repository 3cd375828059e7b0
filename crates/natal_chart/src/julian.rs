//! Calendar (Gregorian) to Julian Day conversion and back.
//!
//! Standard Meeus formulas. Julian Day here is the continuous day count
//! on the UT scale; sub-day precision is carried in the fractional part.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Convert a Gregorian calendar date to a Julian Day.
///
/// `day` carries the fractional day (e.g. 1.5 for noon on the 1st).
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let a = y.div_euclid(100);
    let b = 2 - a + a.div_euclid(4);
    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day
        + b as f64
        - 1524.5
}

/// Convert a Julian Day back to `(year, month, fractional_day)`.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let jd = jd + 0.5;
    let z = jd.floor();
    let f = jd - z;

    let a = if z < 2_299_161.0 {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 } as u32;
    let year = if month > 2 { c - 4716.0 } else { c - 4715.0 } as i32;

    (year, month, day)
}

/// Convert a Julian Day (UT) to a UTC calendar timestamp, rounded to
/// the nearest millisecond.
pub fn jd_to_utc(jd: f64) -> Option<NaiveDateTime> {
    let (year, month, day_frac) = jd_to_calendar(jd);
    let day = day_frac.floor();
    let millis = ((day_frac - day) * 86_400_000.0).round() as i64;
    let date = NaiveDate::from_ymd_opt(year, month, day as u32)?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt + Duration::milliseconds(millis))
}
