//! Hourly slot placement and collision counting for a single day.

use chrono::NaiveDate;

use crate::models::event::Event;
use crate::models::grid::{LayoutResult, RenderedSlotMap};
use crate::models::timezone::Timezone;
use crate::services::projection::TimezoneProjector;
use crate::utils::date::MINUTES_PER_DAY;

/// Granularity of the stacking key, in minutes.
pub const MINUTE_BUCKET: u32 = 5;
const LAST_BUCKET: u32 = 60 - MINUTE_BUCKET;

/// Nearest 5-minute tick, kept inside the hour.
pub fn minute_bucket(minute: u32) -> u32 {
    ((minute + MINUTE_BUCKET / 2) / MINUTE_BUCKET * MINUTE_BUCKET).min(LAST_BUCKET)
}

/// Interval an event occupies on the day being laid out, in minutes of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DayInterval {
    event_id: i64,
    start: u32,
    /// Up to `MINUTES_PER_DAY` for events running past midnight
    end: u32,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    event: &'a Event,
    hour: u32,
    minute_bucket: u32,
    interval: DayInterval,
    crosses_midnight: bool,
}

impl<'a> Candidate<'a> {
    fn new(event: &'a Event, current_day: Option<NaiveDate>, tz: Option<Timezone>) -> Option<Self> {
        let projection = TimezoneProjector::project_opt(event, tz);
        let Some(start) = projection.start else {
            log::warn!("Event {} has no start time, skipping slot placement", event.id);
            return None;
        };
        let multi_day = projection.is_multi_day();

        // Day view draws a multi-day event that began earlier from the top of the grid.
        let pinned = multi_day && current_day.is_some_and(|day| start.date() < day);

        let (hour, minute, start_min) = if pinned {
            (0, 0, 0)
        } else {
            (start.hour(), start.minute(), start.minute_of_day())
        };

        let (end_min, crosses_midnight) = match projection.end {
            None => (start_min, false),
            Some(end) if pinned => {
                let ends_today = current_day.is_some_and(|day| end.date() <= day);
                if ends_today {
                    (end.minute_of_day(), false)
                } else {
                    (MINUTES_PER_DAY, false)
                }
            }
            // On its start day a multi-day event runs to midnight.
            Some(end) if multi_day => (MINUTES_PER_DAY, end.minute_of_day() <= start_min),
            Some(end) => (end.minute_of_day(), false),
        };

        Some(Self {
            event,
            hour,
            minute_bucket: minute_bucket(minute),
            interval: DayInterval {
                event_id: event.id,
                start: start_min,
                end: end_min,
            },
            crosses_midnight,
        })
    }

    /// Distinct events among `placed` this candidate collides with.
    fn overlap_count(&self, placed: &[DayInterval]) -> usize {
        let mut seen: Vec<i64> = Vec::new();

        for other in placed {
            if other.event_id == self.event.id || seen.contains(&other.event_id) {
                continue;
            }

            let collides = if self.crosses_midnight {
                // Only the part before midnight is checked, and only against
                // intervals that end before midnight themselves.
                other.end < MINUTES_PER_DAY && self.interval.start < other.end
            } else {
                let contained = other.start <= self.interval.start && self.interval.end <= other.end;
                contained || (self.interval.start < other.end && other.start < self.interval.end)
            };

            if collides {
                seen.push(other.event_id);
            }
        }

        seen.len()
    }
}

/// Stateless overlap layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapLayoutEngine;

impl OverlapLayoutEngine {
    /// Place the events of one day into hour/minute-bucket slots.
    ///
    /// Pass `current_day` in Day view so multi-day events that started on an
    /// earlier date are pinned to hour 0; Week view passes `None` and every
    /// event keeps its own start hour.
    ///
    /// Events are processed by ascending placement hour. Ties keep input
    /// order, so callers wanting stable output across requests should
    /// pre-sort deterministically (e.g. by id). Events with no start time
    /// are left out of the map.
    pub fn layout<'a, I>(
        events: I,
        current_day: Option<NaiveDate>,
        visitor_tz: Option<Timezone>,
    ) -> RenderedSlotMap<'a>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut candidates: Vec<Candidate<'a>> = events
            .into_iter()
            .filter_map(|event| Candidate::new(event, current_day, visitor_tz))
            .collect();
        candidates.sort_by_key(|candidate| candidate.hour);

        let mut placed: Vec<DayInterval> = Vec::with_capacity(candidates.len());
        let mut slots = RenderedSlotMap::new();

        for candidate in candidates {
            let overlap_count = candidate.overlap_count(&placed);
            log::trace!(
                "event {} -> {:02}:{:02} (overlaps {})",
                candidate.event.id,
                candidate.hour,
                candidate.minute_bucket,
                overlap_count
            );

            placed.push(candidate.interval);
            slots.insert(LayoutResult {
                event: candidate.event,
                hour: candidate.hour,
                minute_bucket: candidate.minute_bucket,
                overlap_count,
            });
        }

        slots
    }
}
