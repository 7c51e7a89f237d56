//! Calendar input to continuous time conversion.
//!
//! Local wall-clock input ("YYYY-MM-DD", "HH:MM", timezone) is shifted to UT
//! and expressed as a [`CalendarMoment`] whose hour may fall outside 0..24.
//! [`TimePoint`] is the matching Julian Day (UT), computed with the
//! proleptic Gregorian algorithm from Meeus.

use crate::error::ChartError;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref OFFSET_PATTERN: regex::Regex =
        regex::Regex::new(r"^([+-])(\d{1,2}):(\d{2})$").expect("offset pattern is valid");
}

/// Julian Day of the J2000.0 epoch
pub const J2000: f64 = 2_451_545.0;

/// Calendar date with a fractional UT hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarMoment {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hours since midnight UT; may be negative or >= 24 after a timezone shift
    pub hour: f64,
}

/// Continuous day count (Julian Day, UT)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(pub f64);

impl TimePoint {
    pub fn julian_day(self) -> f64 {
        self.0
    }
}

impl CalendarMoment {
    pub fn to_time_point(&self) -> TimePoint {
        let day_frac = self.day as f64 + self.hour / 24.0;
        TimePoint(calendar_to_jd(self.year, self.month, day_frac))
    }

    /// Inverse of [`CalendarMoment::to_time_point`]; the hour comes back in 0..24.
    pub fn from_time_point(point: TimePoint) -> Self {
        let (year, month, day_frac) = jd_to_calendar(point.0);
        let day = day_frac.floor();
        Self {
            year,
            month,
            day: day as u32,
            hour: (day_frac - day) * 24.0,
        }
    }
}

/// Date, time and timezone as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentInput {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl MomentInput {
    pub fn new(date: impl Into<String>, time: impl Into<String>, timezone: Option<&str>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            timezone: timezone.map(str::to_string),
        }
    }

    pub fn resolve(&self) -> Result<CalendarMoment, ChartError> {
        resolve_moment(&self.date, &self.time, self.timezone.as_deref())
    }
}

/// Convert local date/time/timezone into a UT calendar moment.
///
/// Date and time are validated eagerly. An unrecognized timezone falls back
/// to a zero offset.
pub fn resolve_moment(
    date: &str,
    time: &str,
    timezone: Option<&str>,
) -> Result<CalendarMoment, ChartError> {
    let date_value = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ChartError::invalid("date", date, format!("expected YYYY-MM-DD ({e})")))?;
    let time_value = parse_clock_time(time)?;

    let local_hour = time_value.hour() as f64
        + time_value.minute() as f64 / 60.0
        + time_value.second() as f64 / 3600.0;
    let offset = timezone.map(parse_timezone_offset).unwrap_or(0.0);

    Ok(CalendarMoment {
        year: date_value.year(),
        month: date_value.month(),
        day: date_value.day(),
        hour: local_hour - offset,
    })
}

fn parse_clock_time(time: &str) -> Result<NaiveTime, ChartError> {
    let trimmed = time.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| ChartError::invalid("time", time, format!("expected HH:MM ({e})")))
}

/// Timezone offset in hours east of UT.
///
/// Accepts "Z", a signed "+HH:MM" / "-HH:MM" offset, or a decimal hour value
/// ("5.5", "-3"). Anything else yields 0.
pub fn parse_timezone_offset(timezone: &str) -> f64 {
    let tz = timezone.trim();
    if tz.is_empty() || tz.eq_ignore_ascii_case("z") {
        return 0.0;
    }

    if let Some(caps) = OFFSET_PATTERN.captures(tz) {
        let hours: f64 = caps[2].parse().unwrap_or(0.0);
        let minutes: f64 = caps[3].parse().unwrap_or(0.0);
        let magnitude = hours + minutes / 60.0;
        return if &caps[1] == "-" { -magnitude } else { magnitude };
    }

    match tz.parse::<f64>() {
        Ok(hours) if hours.is_finite() => hours,
        _ => {
            log::warn!("Unrecognized timezone '{}', assuming UT", tz);
            0.0
        }
    }
}

/// Calendar date (fractional day) to Julian Day, proleptic Gregorian.
pub fn calendar_to_jd(year: i32, month: u32, day_frac: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day_frac + b - 1524.5
}

/// Julian Day to (year, month, fractional day), proleptic Gregorian.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let shifted = jd + 0.5;
    let z = shifted.floor();
    let f = shifted - z;
    let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
    let a = z + 1.0 + alpha - (alpha / 4.0).floor();
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day_frac = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };
    (year as i32, month as u32, day_frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_epoch() {
        assert!((calendar_to_jd(2000, 1, 1.5) - J2000).abs() < 1e-9);
    }

    #[test]
    fn gregorian_reform_boundary() {
        // 1582-10-15 follows 1582-10-04 Julian; proleptic Gregorian keeps counting.
        assert!((calendar_to_jd(1582, 10, 15.0) - 2_299_160.5).abs() < 1e-9);
    }

    #[test]
    fn offset_forms() {
        assert_eq!(parse_timezone_offset("Z"), 0.0);
        assert_eq!(parse_timezone_offset("+05:30"), 5.5);
        assert_eq!(parse_timezone_offset("-03:45"), -3.75);
        assert_eq!(parse_timezone_offset("-8"), -8.0);
        assert_eq!(parse_timezone_offset("5.5"), 5.5);
        assert_eq!(parse_timezone_offset("Europe/Paris"), 0.0);
    }

    #[test]
    fn seconds_are_accepted() {
        let moment = resolve_moment("2020-06-01", "12:30:36", None).unwrap();
        assert!((moment.hour - 12.51).abs() < 1e-9);
    }
}
