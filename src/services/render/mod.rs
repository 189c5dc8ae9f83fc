//! One render pass over a fixed set of events.
//!
//! A `RenderPass` lives for a single view request. It resolves the visitor
//! timezone once, classifies each visible day at most once (results are
//! cached for the pass), and drives the grid, overlap and span services to
//! produce the Day, Week and Month layouts.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::models::event::Event;
use crate::models::grid::{CellType, RenderedSlotMap, SpanWidth};
use crate::models::settings::LayoutSettings;
use crate::models::timezone::Timezone;
use crate::services::classifier::{DayBucketClassifier, DayBuckets, DayMembership, IntersectsDay};
use crate::services::grid::{GridCellEngine, PlacedCell};
use crate::services::overlap::OverlapLayoutEngine;
use crate::services::projection::TimezoneProjector;
use crate::services::span::{SpanWidthCalculator, DAYS_PER_WEEK};
use crate::utils::date::{get_week_start, month_grid_start, month_week_rows, start_of_day};

/// A multi-day bar in one week row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanBar<'a> {
    pub event: &'a Event,
    pub row: u32,
    pub column: u32,
    pub span: SpanWidth,
    /// The event started before this row; this bar continues it
    pub continued: bool,
}

#[derive(Debug, Clone)]
pub struct DayLayout<'a> {
    pub date: NaiveDate,
    pub buckets: DayBuckets<'a>,
    pub cells: Vec<PlacedCell<'a>>,
    /// Timed events, with multi-day continuations pinned to hour 0
    pub slots: RenderedSlotMap<'a>,
}

#[derive(Debug, Clone)]
pub struct WeekLayout<'a> {
    pub days: Vec<NaiveDate>,
    pub cells: Vec<PlacedCell<'a>>,
    /// One slot map per day column
    pub slots: Vec<RenderedSlotMap<'a>>,
    pub bars: Vec<SpanBar<'a>>,
}

#[derive(Debug, Clone)]
pub struct MonthDay<'a> {
    pub date: NaiveDate,
    /// False for the leading/trailing days of neighbouring months
    pub in_month: bool,
    pub buckets: DayBuckets<'a>,
}

#[derive(Debug, Clone)]
pub struct WeekRow<'a> {
    pub days: Vec<MonthDay<'a>>,
    pub bars: Vec<SpanBar<'a>>,
}

#[derive(Debug, Clone)]
pub struct MonthLayout<'a> {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<WeekRow<'a>>,
}

pub struct RenderPass<'a, M = IntersectsDay> {
    events: &'a [Event],
    classifier: DayBucketClassifier<M>,
    visitor_tz: Option<Timezone>,
    first_day_of_week: u8,
    cache: HashMap<NaiveDate, DayBuckets<'a>>,
}

impl<'a> RenderPass<'a, IntersectsDay> {
    /// Start a pass using the settings' week start and visitor timezone.
    pub fn new(events: &'a [Event], settings: &LayoutSettings) -> Result<Self> {
        Self::with_classifier(events, settings, DayBucketClassifier::new())
    }
}

impl<'a, M: DayMembership> RenderPass<'a, M> {
    /// Start a pass with the query layer's own day-membership predicate.
    pub fn with_classifier(
        events: &'a [Event],
        settings: &LayoutSettings,
        classifier: DayBucketClassifier<M>,
    ) -> Result<Self> {
        if settings.first_day_of_week > 6 {
            return Err(LayoutError::InvalidWeekStart(settings.first_day_of_week));
        }
        let visitor_tz = settings.visitor_timezone()?;
        log::debug!(
            "render pass over {} events, visitor timezone {}",
            events.len(),
            visitor_tz.map(|tz| tz.to_string()).unwrap_or_else(|| "native".to_string())
        );

        Ok(Self {
            events,
            classifier,
            visitor_tz,
            first_day_of_week: settings.first_day_of_week,
            cache: HashMap::new(),
        })
    }

    pub fn visitor_timezone(&self) -> Option<Timezone> {
        self.visitor_tz
    }

    /// Classified events for `date`, computed once per pass.
    pub fn day_buckets(&mut self, date: NaiveDate) -> DayBuckets<'a> {
        let events = self.events;
        let tz = self.visitor_tz;
        let classifier = &self.classifier;
        self.cache
            .entry(date)
            .or_insert_with(|| classifier.classify_date(events, date, tz))
            .clone()
    }

    /// Day view: one column of cells, and an hourly slot map that also holds
    /// timed multi-day events (continuations from earlier days sit at hour 0).
    pub fn day_view(&mut self, date: NaiveDate) -> DayLayout<'a> {
        let buckets = self.day_buckets(date);
        let grid_start = start_of_day(date);
        let cells = GridCellEngine::build_cells(grid_start, grid_start + Duration::days(1), 1);
        let placed = GridCellEngine::place(&cells, std::slice::from_ref(&buckets), self.visitor_tz);

        let timed = buckets.iter().filter(|event| !event.renders_as_all_day());
        let slots = OverlapLayoutEngine::layout(timed, Some(date), self.visitor_tz);

        DayLayout {
            date,
            buckets,
            cells: placed,
            slots,
        }
    }

    /// Week view for the week containing `anchor`.
    ///
    /// Hourly slots hold only single-date timed events; multi-day events are
    /// drawn as bars in the multi-day row.
    pub fn week_view(&mut self, anchor: NaiveDate) -> WeekLayout<'a> {
        let week_start = get_week_start(anchor, self.first_day_of_week);
        let days: Vec<NaiveDate> = (0..DAYS_PER_WEEK as i64)
            .map(|offset| week_start + Duration::days(offset))
            .collect();
        let buckets: Vec<DayBuckets<'a>> = days.iter().map(|day| self.day_buckets(*day)).collect();

        let grid_start = start_of_day(week_start);
        let cells = GridCellEngine::build_cells(
            grid_start,
            grid_start + Duration::days(DAYS_PER_WEEK as i64),
            DAYS_PER_WEEK as u32,
        );
        let placed = GridCellEngine::place(&cells, &buckets, self.visitor_tz);

        let tz = self.visitor_tz;
        let slots = buckets
            .iter()
            .map(|day| {
                let hourly = day
                    .iter()
                    .filter(|event| !GridCellEngine::skip_item_in_cell(event, CellType::Hour(0), tz));
                OverlapLayoutEngine::layout(hourly, None, tz)
            })
            .collect();

        let bars = self.row_bars(&days, &buckets, 0);
        log::debug!("week of {}: {} multi-day bars", week_start, bars.len());

        WeekLayout {
            days,
            cells: placed,
            slots,
            bars,
        }
    }

    /// Month view: week rows covering every day of the month.
    pub fn month_view(&mut self, year: i32, month: u32) -> Result<MonthLayout<'a>> {
        let invalid = LayoutError::InvalidDate { year, month, day: 1 };
        let grid_start = month_grid_start(year, month, self.first_day_of_week).ok_or(invalid)?;
        let row_count = month_week_rows(year, month, self.first_day_of_week).unwrap_or(0);

        let mut rows = Vec::with_capacity(row_count as usize);
        for row in 0..row_count {
            let row_start = grid_start + Duration::days(row as i64 * DAYS_PER_WEEK as i64);
            let dates: Vec<NaiveDate> = (0..DAYS_PER_WEEK as i64)
                .map(|offset| row_start + Duration::days(offset))
                .collect();
            let buckets: Vec<DayBuckets<'a>> = dates.iter().map(|day| self.day_buckets(*day)).collect();

            let bars = self.row_bars(&dates, &buckets, row);
            let days = dates
                .iter()
                .zip(buckets)
                .map(|(date, buckets)| MonthDay {
                    date: *date,
                    in_month: date.month() == month,
                    buckets,
                })
                .collect();

            rows.push(WeekRow { days, bars });
        }

        log::debug!("month {}-{:02}: {} week rows", year, month, rows.len());
        Ok(MonthLayout { year, month, rows })
    }

    /// One bar per multi-day event per week row, anchored at the first
    /// column the event is active in. A bar for an event that began before
    /// the row is sized from that column, so a continuation starts at 0.
    fn row_bars(&self, dates: &[NaiveDate], buckets: &[DayBuckets<'a>], row: u32) -> Vec<SpanBar<'a>> {
        let mut bars: Vec<SpanBar<'a>> = Vec::new();

        for (column, (date, day)) in dates.iter().zip(buckets).enumerate() {
            for &event in &day.multi_day {
                if bars.iter().any(|bar| std::ptr::eq(bar.event, event)) {
                    continue;
                }

                let projection = TimezoneProjector::project_opt(event, self.visitor_tz);
                let (Some(start), Some(end)) = (projection.start, projection.end) else {
                    continue;
                };

                // An end at exactly midnight does not occupy that date.
                let mut last_date = end.date();
                if end.minute_of_day() == 0 && last_date > start.date() {
                    last_date -= Duration::days(1);
                }

                let span = SpanWidthCalculator::compute_span_dates(*date, last_date, column as u32);
                bars.push(SpanBar {
                    event,
                    row,
                    column: column as u32,
                    span,
                    continued: start.date() < *date,
                });
            }
        }

        bars
    }
}
