// Test fixtures - reusable test data
// Provides consistent events and dates across the integration test files

#![allow(dead_code)]

use calendar_layout::models::event::Event;
use calendar_layout::models::timezone::{EventTime, Timezone};
use chrono::{NaiveDate, NaiveDateTime};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Sunday, Jan 5, 2025
    pub fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    /// Monday, Jan 6, 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    /// Tuesday, Jan 7, 2025
    pub fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 7).unwrap()
    }

    /// A wall-clock time in the week of Jan 5, 2025
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn floating(id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event::new(id, EventTime::floating(start), EventTime::floating(end))
    }

    pub fn zoned(id: i64, start: NaiveDateTime, end: NaiveDateTime, tz: Timezone) -> Event {
        Event::new(id, EventTime::in_zone(start, tz), EventTime::in_zone(end, tz))
    }

    pub fn all_day(id: i64, date: NaiveDate) -> Event {
        Event::builder()
            .id(id)
            .start(EventTime::floating(dates::at(date, 0, 0)))
            .end(EventTime::floating(dates::at(date, 23, 59)))
            .all_day(true)
            .build()
    }

    /// The week-view scenario: two colliding Monday meetings and an
    /// overnight event running from Sunday evening into Tuesday.
    pub fn week_scenario() -> Vec<Event> {
        use dates::{at, monday, sunday, tuesday};
        vec![
            floating(1, at(monday(), 9, 0), at(monday(), 10, 0)),
            floating(2, at(monday(), 9, 15), at(monday(), 9, 45)),
            floating(3, at(sunday(), 22, 0), at(tuesday(), 1, 0)),
        ]
    }
}
