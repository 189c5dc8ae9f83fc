//! Per-day classification of events into multi-day, all-day and simple buckets.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{LayoutError, Result};
use crate::models::event::Event;
use crate::models::timezone::Timezone;
use crate::services::projection::TimezoneProjector;
use crate::utils::date::start_of_day;

/// Day-membership predicate owned by the event query layer.
///
/// The classifier only categorizes events this predicate reports as
/// occupying the day; it never decides membership itself.
pub trait DayMembership {
    fn is_event_for_day(&self, event: &Event, date: NaiveDate, tz: Option<Timezone>) -> bool;
}

impl<F> DayMembership for F
where
    F: Fn(&Event, NaiveDate, Option<Timezone>) -> bool,
{
    fn is_event_for_day(&self, event: &Event, date: NaiveDate, tz: Option<Timezone>) -> bool {
        self(event, date, tz)
    }
}

/// Membership by interval intersection in the projected zone.
///
/// An event touching the day's `[00:00, 24:00)` window is active; one
/// ending exactly at 00:00 is not active on that day. Zero-duration events
/// belong to their start date. With only a start known, the start date.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectsDay;

impl DayMembership for IntersectsDay {
    fn is_event_for_day(&self, event: &Event, date: NaiveDate, tz: Option<Timezone>) -> bool {
        let projection = TimezoneProjector::project_opt(event, tz);
        let (start, end) = match (projection.start, projection.end) {
            (Some(start), Some(end)) => (start.wall_clock(), end.wall_clock()),
            (Some(start), None) => return start.date() == date,
            (None, Some(end)) => return end.date() == date,
            (None, None) => return false,
        };

        if start == end {
            return start.date() == date;
        }

        let day_start = start_of_day(date);
        let day_end = day_start + Duration::days(1);
        start < day_end && end > day_start
    }
}

/// Events active on one day, grouped by how they render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBuckets<'a> {
    pub multi_day: Vec<&'a Event>,
    pub all_day: Vec<&'a Event>,
    pub simple: Vec<&'a Event>,
}

impl<'a> DayBuckets<'a> {
    /// Multi-day first, then all-day, then simple.
    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.multi_day
            .iter()
            .chain(self.all_day.iter())
            .chain(self.simple.iter())
            .copied()
    }

    pub fn ordered(&self) -> Vec<&'a Event> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.multi_day.len() + self.all_day.len() + self.simple.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, event_id: i64) -> bool {
        self.iter().any(|event| event.id == event_id)
    }
}

/// Splits the events active on a day into ordered buckets.
pub struct DayBucketClassifier<M = IntersectsDay> {
    membership: M,
}

impl DayBucketClassifier<IntersectsDay> {
    /// Classifier using interval-intersection membership.
    pub fn new() -> Self {
        Self {
            membership: IntersectsDay,
        }
    }
}

impl Default for DayBucketClassifier<IntersectsDay> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DayMembership> DayBucketClassifier<M> {
    /// Classifier using the query layer's own membership predicate.
    pub fn with_membership(membership: M) -> Self {
        Self { membership }
    }

    /// Classify for a day given as day/month/year.
    ///
    /// The triple must name a real calendar date; anything else is a caller
    /// error reported as `LayoutError::InvalidDate`.
    pub fn classify<'a, I>(
        &self,
        events: I,
        day: u32,
        month: u32,
        year: i32,
        tz: Option<Timezone>,
    ) -> Result<DayBuckets<'a>>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(LayoutError::InvalidDate { year, month, day })?;
        Ok(self.classify_date(events, date, tz))
    }

    /// Classify the events active on `date`.
    ///
    /// Multi-day and simple events are stable-sorted by start instant;
    /// all-day events keep their input order.
    pub fn classify_date<'a, I>(&self, events: I, date: NaiveDate, tz: Option<Timezone>) -> DayBuckets<'a>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut buckets = DayBuckets::default();

        for event in events {
            if !self.membership.is_event_for_day(event, date, tz) {
                continue;
            }

            if TimezoneProjector::is_multi_day(event, tz) {
                log::trace!("event {} is multi-day on {}", event.id, date);
                buckets.multi_day.push(event);
            } else if event.renders_as_all_day() {
                buckets.all_day.push(event);
            } else {
                buckets.simple.push(event);
            }
        }

        // With a visitor zone every start is read as a wall clock in that
        // zone. Without one, zoned starts order by UTC instant and floating
        // starts by their wall clock taken as UTC.
        let start_key = |event: &&'a Event| -> Option<NaiveDateTime> {
            TimezoneProjector::project_opt(event, tz).start.map(|start| match tz {
                Some(_) => start.wall_clock(),
                None => start
                    .instant()
                    .map(|instant| instant.naive_utc())
                    .unwrap_or_else(|| start.wall_clock()),
            })
        };
        buckets.multi_day.sort_by_key(start_key);
        buckets.simple.sort_by_key(start_key);

        log::debug!(
            "classified {}: {} multi-day, {} all-day, {} simple",
            date,
            buckets.multi_day.len(),
            buckets.all_day.len(),
            buckets.simple.len()
        );

        buckets
    }

    pub fn membership(&self) -> &M {
        &self.membership
    }
}
