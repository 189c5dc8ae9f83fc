// Timezone module
// Tagged timezone values and zone-aware event endpoints

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

use crate::error::{LayoutError, Result};

/// Manual offsets are limited to the range real zones use.
const MIN_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Timezone an endpoint was authored in, or the zone a render pass projects into.
///
/// `Floating` is a wall-clock time with no offset at all: it is never
/// converted, so 09:00 floating reads 09:00 for every visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timezone {
    #[default]
    Floating,
    /// IANA zone resolved through chrono-tz
    Named(Tz),
    /// Fixed offset in minutes east of UTC
    FixedOffset(i32),
}

impl Timezone {
    /// Parse a zone string.
    ///
    /// Accepts `""`/`"floating"`, manual offsets (`+05:30`, `-08:00`,
    /// `UTC+5`, `UTC-3:30`, `UTC+5.5`) and IANA names (`Europe/Berlin`, `UTC`).
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("floating") {
            return Ok(Timezone::Floating);
        }
        if trimmed == "Z" {
            return Ok(Timezone::Named(Tz::UTC));
        }

        if let Some(minutes) = parse_manual_offset(trimmed) {
            if !(MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
                return Err(LayoutError::InvalidTimezone(trimmed.to_string()));
            }
            return Ok(Timezone::FixedOffset(minutes));
        }

        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| LayoutError::InvalidTimezone(trimmed.to_string()))
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Timezone::Floating)
    }

    /// Offset in seconds in force at a UTC instant. `None` for floating.
    fn offset_at_utc(&self, utc: &NaiveDateTime) -> Option<i32> {
        match self {
            Timezone::Floating => None,
            Timezone::Named(tz) => Some(tz.offset_from_utc_datetime(utc).fix().local_minus_utc()),
            Timezone::FixedOffset(minutes) => Some(minutes * 60),
        }
    }

    /// Offset in seconds for a wall-clock time in this zone.
    ///
    /// Ambiguous wall clocks (DST fall-back) take the earliest instant.
    /// Skipped wall clocks (DST spring-forward) use the offset in force just
    /// before the gap, which moves the time forward by the gap length.
    fn offset_for_local(&self, local: &NaiveDateTime) -> Option<i32> {
        match self {
            Timezone::Floating => None,
            Timezone::FixedOffset(minutes) => Some(minutes * 60),
            Timezone::Named(tz) => {
                let offset = match tz.offset_from_local_datetime(local) {
                    LocalResult::Single(offset) => offset,
                    LocalResult::Ambiguous(earliest, _) => earliest,
                    LocalResult::None => {
                        let before_gap = *local - Duration::hours(1);
                        match tz.offset_from_local_datetime(&before_gap) {
                            LocalResult::Single(offset) => offset,
                            LocalResult::Ambiguous(earliest, _) => earliest,
                            LocalResult::None => tz.offset_from_utc_datetime(local),
                        }
                    }
                };
                Some(offset.fix().local_minus_utc())
            }
        }
    }
}

impl FromStr for Timezone {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Timezone::parse(s)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Floating => write!(f, "floating"),
            Timezone::Named(tz) => write!(f, "{}", tz.name()),
            Timezone::FixedOffset(minutes) => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let abs = minutes.abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

const MAX_OFFSET_HOURS: i32 = 24;

fn hours_and_minutes(hours: i32, mins: i32) -> Option<i32> {
    if !(0..=MAX_OFFSET_HOURS).contains(&hours) || !(0..60).contains(&mins) {
        return None;
    }
    hours.checked_mul(60)?.checked_add(mins)
}

/// Parse `+HH:MM`, `-H`, `UTC+5:30`, `GMT-3`, `UTC+5.5` style offsets into minutes.
fn parse_manual_offset(value: &str) -> Option<i32> {
    let rest = value
        .strip_prefix("UTC")
        .or_else(|| value.strip_prefix("GMT"))
        .unwrap_or(value);

    let (sign, digits) = match rest.chars().next()? {
        '+' => (1, &rest[1..]),
        '-' => (-1, &rest[1..]),
        _ => return None,
    };
    if digits.is_empty() || !digits.is_ascii() {
        return None;
    }

    let minutes = if let Some((hours, mins)) = digits.split_once(':') {
        hours_and_minutes(hours.parse().ok()?, mins.parse().ok()?)?
    } else if digits.contains('.') {
        let hours: f64 = digits.parse().ok()?;
        if !(0.0..=MAX_OFFSET_HOURS as f64).contains(&hours) {
            return None;
        }
        (hours * 60.0).round() as i32
    } else if digits.len() == 4 {
        hours_and_minutes(digits.get(0..2)?.parse().ok()?, digits.get(2..4)?.parse().ok()?)?
    } else {
        hours_and_minutes(digits.parse().ok()?, 0)?
    };

    Some(sign * minutes)
}

/// One endpoint of an event: a wall-clock time plus the zone it is expressed in.
///
/// Zoned endpoints also carry the resolved UTC offset so the exact instant
/// survives any number of re-projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTime {
    wall: NaiveDateTime,
    tz: Timezone,
    offset_secs: i32,
}

impl EventTime {
    /// Wall-clock time with no zone.
    pub fn floating(wall: NaiveDateTime) -> Self {
        Self {
            wall,
            tz: Timezone::Floating,
            offset_secs: 0,
        }
    }

    /// Wall-clock time authored in `tz`.
    pub fn in_zone(wall: NaiveDateTime, tz: Timezone) -> Self {
        match tz.offset_for_local(&wall) {
            None => Self::floating(wall),
            Some(offset) => Self::from_utc(wall - Duration::seconds(offset as i64), tz),
        }
    }

    /// Express a UTC instant in `tz`. A floating `tz` keeps the UTC wall clock.
    pub fn from_utc(utc: NaiveDateTime, tz: Timezone) -> Self {
        match tz.offset_at_utc(&utc) {
            None => Self::floating(utc),
            Some(offset) => Self {
                wall: utc + Duration::seconds(offset as i64),
                tz,
                offset_secs: offset,
            },
        }
    }

    /// Parse an endpoint string.
    ///
    /// Local forms (`2025-01-06T09:00:00`, `2025-01-06 09:00`, `2025-01-06`)
    /// are read as wall-clock in `tz`. RFC 3339 strings with an explicit
    /// offset are taken as instants; they are expressed in `tz`, or in their
    /// own offset when `tz` is floating.
    pub fn parse(value: &str, tz: Timezone) -> Result<Self> {
        let trimmed = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            let zone = if tz.is_floating() {
                Timezone::FixedOffset(dt.offset().local_minus_utc() / 60)
            } else {
                tz
            };
            return Ok(Self::from_utc(dt.naive_utc(), zone));
        }

        const LOCAL_FORMATS: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ];
        for format in LOCAL_FORMATS {
            if let Ok(wall) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::in_zone(wall, tz));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|wall| Self::in_zone(wall, tz))
            .ok_or_else(|| LayoutError::InvalidDateTime(trimmed.to_string()))
    }

    /// Re-express this endpoint in `target`.
    ///
    /// Floating endpoints, and any projection into `Floating`, return the
    /// endpoint unchanged.
    pub fn in_timezone(&self, target: Timezone) -> Self {
        match (self.naive_utc(), target) {
            (None, _) | (_, Timezone::Floating) => *self,
            (Some(utc), target) => Self::from_utc(utc, target),
        }
    }

    pub fn wall_clock(&self) -> NaiveDateTime {
        self.wall
    }

    pub fn timezone(&self) -> Timezone {
        self.tz
    }

    /// Calendar date of the wall clock.
    pub fn date(&self) -> NaiveDate {
        self.wall.date()
    }

    pub fn hour(&self) -> u32 {
        self.wall.hour()
    }

    pub fn minute(&self) -> u32 {
        self.wall.minute()
    }

    pub fn minute_of_day(&self) -> u32 {
        self.wall.hour() * 60 + self.wall.minute()
    }

    /// The absolute instant, or `None` for a floating endpoint.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.naive_utc().map(|utc| Utc.from_utc_datetime(&utc))
    }

    fn naive_utc(&self) -> Option<NaiveDateTime> {
        if self.tz.is_floating() {
            None
        } else {
            Some(self.wall - Duration::seconds(self.offset_secs as i64))
        }
    }
}
