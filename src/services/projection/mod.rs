//! Visitor-timezone re-projection of event endpoints.
//!
//! Every layout decision that depends on dates (day membership, multi-day
//! classification, hour placement) goes through this module so that an
//! event authored in one zone lands on the right cells for a visitor in
//! another.

use chrono::NaiveDate;

use crate::models::event::Event;
use crate::models::timezone::{EventTime, Timezone};

/// An event's endpoints re-expressed in a target zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

impl Projection {
    /// Start and end fall on different calendar dates.
    ///
    /// A missing endpoint is not evidence of spanning days.
    pub fn is_multi_day(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start.date() != end.date(),
            _ => false,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|start| start.date())
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.map(|end| end.date())
    }

    /// A copy of `source` carrying the projected endpoints.
    pub fn to_event(&self, source: &Event) -> Event {
        Event {
            start: self.start,
            end: self.end,
            ..source.clone()
        }
    }
}

/// Stateless projector; see [`TimezoneProjector::project`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimezoneProjector;

impl TimezoneProjector {
    /// Re-express both endpoints in `target`.
    ///
    /// Floating endpoints keep their wall clock. Projecting into
    /// `Timezone::Floating` leaves each endpoint in its own zone.
    pub fn project(event: &Event, target: Timezone) -> Projection {
        Projection {
            start: event.start.map(|start| start.in_timezone(target)),
            end: event.end.map(|end| end.in_timezone(target)),
        }
    }

    /// Project when a visitor zone is set, otherwise keep native endpoints.
    pub fn project_opt(event: &Event, target: Option<Timezone>) -> Projection {
        match target {
            Some(tz) => Self::project(event, tz),
            None => Projection {
                start: event.start,
                end: event.end,
            },
        }
    }

    /// Whether the event starts and ends on different dates in `target`.
    pub fn is_multi_day_in_tz(event: &Event, target: Timezone) -> bool {
        Self::project(event, target).is_multi_day()
    }

    /// Multi-day test under an optional visitor zone; falls back to the
    /// event's native flag.
    pub fn is_multi_day(event: &Event, target: Option<Timezone>) -> bool {
        match target {
            Some(tz) => Self::is_multi_day_in_tz(event, tz),
            None => event.is_multi_day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use chrono_tz::Tz;

    fn wall(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn zoned(id: i64, start: NaiveDateTime, end: NaiveDateTime, tz: Timezone) -> Event {
        Event::new(id, EventTime::in_zone(start, tz), EventTime::in_zone(end, tz))
    }

    #[test]
    fn test_two_minutes_across_midnight_is_multi_day() {
        let utc = Timezone::Named(Tz::UTC);
        let event = zoned(1, wall(6, 23, 59), wall(7, 0, 1), utc);
        assert!(TimezoneProjector::is_multi_day_in_tz(&event, utc));
    }

    #[test]
    fn test_long_event_on_one_date_after_shift_is_not_multi_day() {
        // 22:00 UTC Jan 5 -> 21:00 UTC Jan 6 is 23 hours apart on two UTC dates,
        // but both land on Jan 6 at UTC+2.
        let utc = Timezone::Named(Tz::UTC);
        let event = zoned(1, wall(5, 22, 0), wall(6, 21, 0), utc);
        assert!(TimezoneProjector::is_multi_day_in_tz(&event, utc));
        assert!(!TimezoneProjector::is_multi_day_in_tz(
            &event,
            Timezone::FixedOffset(120)
        ));
    }

    #[test]
    fn test_same_date_event_becomes_multi_day_for_visitor() {
        let berlin = Timezone::Named(Tz::Europe__Berlin);
        let event = zoned(1, wall(6, 20, 0), wall(6, 23, 0), berlin);
        assert!(!event.is_multi_day());

        let tokyo = Timezone::Named(Tz::Asia__Tokyo);
        let projection = TimezoneProjector::project(&event, tokyo);
        assert_eq!(projection.start.unwrap().wall_clock(), wall(7, 4, 0));
        assert_eq!(projection.end.unwrap().wall_clock(), wall(7, 7, 0));
        assert!(!projection.is_multi_day());

        let new_york = Timezone::Named(Tz::America__New_York);
        // 14:00 -> 17:00 in New York, still one day
        assert!(!TimezoneProjector::is_multi_day_in_tz(&event, new_york));

        // 11:00 -> 22:30 UTC is 22:00 -> 09:30 next day at +11
        let late = zoned(2, wall(6, 12, 0), wall(6, 23, 30), berlin);
        assert!(TimezoneProjector::is_multi_day_in_tz(&late, Timezone::FixedOffset(11 * 60)));
    }

    #[test]
    fn test_missing_endpoint_is_not_multi_day() {
        let event = Event::builder()
            .id(1)
            .end(EventTime::floating(wall(9, 0, 0)))
            .build();
        assert!(!TimezoneProjector::is_multi_day_in_tz(
            &event,
            Timezone::Named(Tz::UTC)
        ));
        assert!(!TimezoneProjector::is_multi_day(&event, None));
    }

    #[test]
    fn test_no_visitor_zone_uses_native_flag() {
        let event = Event::new(
            1,
            EventTime::floating(wall(6, 22, 0)),
            EventTime::floating(wall(7, 1, 0)),
        );
        assert!(TimezoneProjector::is_multi_day(&event, None));
    }

    #[test]
    fn test_projection_does_not_mutate_source() {
        let berlin = Timezone::Named(Tz::Europe__Berlin);
        let event = zoned(1, wall(6, 9, 0), wall(6, 10, 0), berlin);
        let before = event.clone();

        let projected = TimezoneProjector::project(&event, Timezone::FixedOffset(-300)).to_event(&event);
        assert_eq!(event, before);
        assert_eq!(projected.id, event.id);
        assert_ne!(projected.start, event.start);

        let back = TimezoneProjector::project(&projected, berlin);
        assert_eq!(back.start, event.start);
        assert_eq!(back.end, event.end);
    }
}
