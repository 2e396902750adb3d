use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::errors::TimestampError;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The timezone whose calendar decides which day a timestamp belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    pub fn today(&self) -> NaiveDate {
        match self {
            Zone::Local => Local::now().date_naive(),
            Zone::Named(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }

    fn wall_clock(&self, instant: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            Zone::Local => instant.with_timezone(&Local).naive_local(),
            Zone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        s.parse::<Tz>().map(Zone::Named).map_err(|e| e.to_string())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// A timestamp placed on the wall clock of a [`Zone`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Date-only input; there is no time of day to show.
    Day(NaiveDate),
    WallClock(NaiveDateTime),
}

impl Resolved {
    pub fn date(&self) -> NaiveDate {
        match self {
            Resolved::Day(date) => *date,
            Resolved::WallClock(dt) => dt.date(),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Resolved::Day(_) => None,
            Resolved::WallClock(dt) => Some(dt.time()),
        }
    }
}

/// Parses a backend timestamp.
///
/// Accepted forms are `YYYY-MM-DD`, and a date followed by `HH`, `HH:MM`,
/// `HH:MM:SS` or `HH:MM:SS.fff` with an optional `Z`, `+HH:MM` or `+HHMM`
/// offset. Timestamps without an offset are wall-clock times in `zone` (the
/// backend writes naive ISO strings); timestamps with an offset are converted
/// into `zone` first. Both `T` and a single space are accepted between the
/// date and the time.
pub fn resolve(input: &str, zone: &Zone) -> Result<Resolved, TimestampError> {
    let trimmed = input.trim();
    let normalized = normalize_separator(trimmed);

    if let Ok(instant) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(Resolved::WallClock(zone.wall_clock(&instant)));
    }
    for format in OFFSET_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(&normalized, format) {
            return Ok(Resolved::WallClock(zone.wall_clock(&instant)));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(Resolved::WallClock(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(Resolved::Day(date));
    }
    Err(TimestampError {
        input: input.to_string(),
    })
}

pub fn local_day(input: &str, zone: &Zone) -> Result<NaiveDate, TimestampError> {
    resolve(input, zone).map(|r| r.date())
}

fn normalize_separator(s: &str) -> String {
    // "2024-02-10 10:00:00" -> "2024-02-10T10:00:00"
    let s = match s.as_bytes().get(10) {
        Some(b' ') if s.len() > 11 => format!("{}T{}", &s[..10], &s[11..]),
        _ => s.to_string(),
    };
    // "2024-02-10T10" -> "2024-02-10T10:00"
    if s.len() == 13 && s.as_bytes()[10] == b'T' {
        format!("{s}:00")
    } else {
        s
    }
}
