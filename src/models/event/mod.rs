// Event module
// Read-only event records handed to the layout engine

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::timezone::{EventTime, Timezone};
use crate::error::{LayoutError, Result};

/// A single calendar occurrence as supplied by the query layer.
///
/// Recurring events arrive already expanded; each occurrence is an
/// independent `Event`. The layout engine never mutates an `Event`: every
/// per-render fact (overlap count, grid slot) lives in a separate result
/// wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub all_day: bool,
}

impl Event {
    /// Create a timed event with both endpoints known.
    ///
    /// `start <= end` is a precondition owned by the data layer and is not
    /// checked here.
    ///
    /// # Examples
    /// ```
    /// use calendar_layout::models::event::Event;
    /// use calendar_layout::models::timezone::EventTime;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap().and_hms_opt(10, 0, 0).unwrap();
    /// let event = Event::new(1, EventTime::floating(start), EventTime::floating(end));
    /// assert!(!event.is_multi_day());
    /// ```
    pub fn new(id: i64, start: EventTime, end: EventTime) -> Self {
        Self {
            id,
            title: String::new(),
            start: Some(start),
            end: Some(end),
            all_day: false,
        }
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Native multi-day flag: the endpoints' own wall-clock dates differ.
    ///
    /// Missing endpoints are never evidence of spanning days.
    pub fn is_multi_day(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start.date() != end.date(),
            _ => false,
        }
    }

    /// Duration between the endpoints, if both are known and zoned or both floating.
    pub fn duration(&self) -> Option<Duration> {
        let (start, end) = (self.start?, self.end?);
        match (start.instant(), end.instant()) {
            (Some(s), Some(e)) => Some(e - s),
            _ => Some(end.wall_clock() - start.wall_clock()),
        }
    }

    /// Both endpoints known and equal.
    pub fn is_zero_duration(&self) -> bool {
        self.duration() == Some(Duration::zero())
    }

    /// Flagged all-day and actually covering time. A zero-duration event
    /// renders as a timed event whatever its flag says.
    pub fn renders_as_all_day(&self) -> bool {
        self.all_day && !self.is_zero_duration()
    }

    /// Calendar date the event starts on, in its own timezone.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|start| start.date())
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: i64,
    title: String,
    start: Option<EventTime>,
    end: Option<EventTime>,
    all_day: bool,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: 0,
            title: String::new(),
            start: None,
            end: None,
            all_day: false,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn start(mut self, start: EventTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: EventTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Build the event. Endpoints left unset stay unknown.
    pub fn build(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            start: self.start,
            end: self.end,
            all_day: self.all_day,
        }
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized event shape accepted from the query layer.
///
/// ```json
/// {"id": 3, "title": "Offsite", "start": "2025-01-05T22:00:00",
///  "end": "2025-01-07T01:00:00", "start_tz": "Europe/Berlin", "all_day": false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub start_tz: Option<String>,
    /// Falls back to `start_tz` when absent
    #[serde(default)]
    pub end_tz: Option<String>,
    #[serde(default)]
    pub all_day: bool,
}

impl TryFrom<EventRecord> for Event {
    type Error = LayoutError;

    fn try_from(record: EventRecord) -> Result<Self> {
        let start_tz = parse_zone(record.start_tz.as_deref())?;
        let end_tz = match record.end_tz.as_deref() {
            Some(value) => Timezone::parse(value)?,
            None => start_tz,
        };

        let start = record
            .start
            .as_deref()
            .map(|value| EventTime::parse(value, start_tz))
            .transpose()?;
        let end = record
            .end
            .as_deref()
            .map(|value| EventTime::parse(value, end_tz))
            .transpose()?;

        let mut event = Event {
            id: record.id,
            title: record.title,
            start,
            end,
            all_day: record.all_day,
        };

        // A one-day all-day record given as a bare date on both ends
        // covers the whole of that day.
        if event.all_day && event.is_zero_duration() {
            event.end = event.start.and_then(|start| {
                start
                    .date()
                    .and_hms_opt(23, 59, 0)
                    .map(|wall| EventTime::in_zone(wall, start.timezone()))
            });
        }

        Ok(event)
    }
}

fn parse_zone(value: Option<&str>) -> Result<Timezone> {
    value.map(Timezone::parse).unwrap_or(Ok(Timezone::Floating))
}
