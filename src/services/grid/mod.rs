//! Partitioning of a day/week time range into all-day, multi-day and hourly cells.

use chrono::{Duration, NaiveDateTime};

use crate::models::event::Event;
use crate::models::grid::{CellType, GridCell};
use crate::models::timezone::Timezone;
use crate::services::classifier::DayBuckets;
use crate::services::projection::TimezoneProjector;
use crate::utils::date::start_of_day;

pub const HOURS_PER_DAY: u32 = 24;

/// A cell together with the events that render in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCell<'a> {
    pub cell: GridCell,
    pub events: Vec<&'a Event>,
}

/// Stateless grid cell builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridCellEngine;

impl GridCellEngine {
    /// Build the cells for `day_count` days starting on the date of `grid_start`.
    ///
    /// Cells come out row by row: the all-day row, the multi-day row, then
    /// one row per hour, each row holding one cell per day. Cell ends never
    /// pass `grid_end`. Identical inputs always give value-equal cells.
    pub fn build_cells(grid_start: NaiveDateTime, grid_end: NaiveDateTime, day_count: u32) -> Vec<GridCell> {
        let first_day = start_of_day(grid_start.date());
        let mut cells = Vec::with_capacity((day_count * (HOURS_PER_DAY + 2)) as usize);

        let clamp = |start: NaiveDateTime, end: NaiveDateTime| (start, end.min(grid_end).max(start));

        for cell_type in [CellType::AllDay, CellType::MultiDay] {
            for day_index in 0..day_count {
                let day_start = first_day + Duration::days(day_index as i64);
                let (start, end) = clamp(day_start, day_start + Duration::days(1));
                cells.push(GridCell {
                    start,
                    end,
                    cell_type,
                    day_index,
                });
            }
        }

        for hour in 0..HOURS_PER_DAY {
            for day_index in 0..day_count {
                let hour_start = first_day + Duration::days(day_index as i64) + Duration::hours(hour as i64);
                let (start, end) = clamp(hour_start, hour_start + Duration::hours(1));
                cells.push(GridCell {
                    start,
                    end,
                    cell_type: CellType::Hour(hour),
                    day_index,
                });
            }
        }

        log::debug!(
            "built {} cells for {} day(s) from {}",
            cells.len(),
            day_count,
            first_day
        );
        cells
    }

    /// Whether `event` must stay out of a cell of `cell_type`.
    ///
    /// All-day cells take only all-day events; multi-day cells take timed
    /// events spanning more than one date; hour cells take timed events on
    /// a single date, including zero-duration events flagged all-day. No
    /// event passes for more than one structural row.
    pub fn skip_item_in_cell(event: &Event, cell_type: CellType, tz: Option<Timezone>) -> bool {
        match cell_type {
            CellType::AllDay => !event.renders_as_all_day(),
            CellType::MultiDay => event.all_day || !TimezoneProjector::is_multi_day(event, tz),
            CellType::Hour(_) => event.renders_as_all_day() || TimezoneProjector::is_multi_day(event, tz),
        }
    }

    /// The day's classified events that render in `cell`.
    ///
    /// Hour cells additionally keep only events whose projected start falls
    /// inside the cell.
    pub fn events_for_cell<'a>(cell: &GridCell, day: &DayBuckets<'a>, tz: Option<Timezone>) -> Vec<&'a Event> {
        day.iter()
            .filter(|event| !Self::skip_item_in_cell(event, cell.cell_type, tz))
            .filter(|event| match cell.cell_type {
                CellType::Hour(_) => TimezoneProjector::project_opt(event, tz)
                    .start
                    .map(|start| start.wall_clock())
                    .is_some_and(|start| cell.start <= start && start < cell.end),
                CellType::AllDay | CellType::MultiDay => true,
            })
            .collect()
    }

    /// Fill every cell from the classified events of its day.
    ///
    /// `days[i]` holds the buckets for `day_index == i`; cells pointing past
    /// the end of `days` stay empty.
    pub fn place<'a>(cells: &[GridCell], days: &[DayBuckets<'a>], tz: Option<Timezone>) -> Vec<PlacedCell<'a>> {
        cells
            .iter()
            .map(|cell| PlacedCell {
                cell: *cell,
                events: days
                    .get(cell.day_index as usize)
                    .map(|day| Self::events_for_cell(cell, day, tz))
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timezone::EventTime;
    use crate::services::classifier::DayBucketClassifier;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn wall(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn timed(id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event::new(id, EventTime::floating(start), EventTime::floating(end))
    }

    #[test]
    fn test_cell_counts() {
        let cells = GridCellEngine::build_cells(wall(5, 0, 0), wall(12, 0, 0), 7);
        let count = |pred: fn(&CellType) -> bool| cells.iter().filter(|c| pred(&c.cell_type)).count();

        assert_eq!(cells.len(), 7 * 26);
        assert_eq!(count(|t| *t == CellType::AllDay), 7);
        assert_eq!(count(|t| *t == CellType::MultiDay), 7);
        assert_eq!(count(|t| matches!(t, CellType::Hour(_))), 7 * 24);
    }

    #[test]
    fn test_cell_order_and_boundaries() {
        let cells = GridCellEngine::build_cells(wall(6, 0, 0), wall(8, 0, 0), 2);

        assert_eq!(cells[0].cell_type, CellType::AllDay);
        assert_eq!(cells[1], GridCell {
            start: wall(7, 0, 0),
            end: wall(8, 0, 0),
            cell_type: CellType::AllDay,
            day_index: 1,
        });
        assert_eq!(cells[2].cell_type, CellType::MultiDay);
        assert_eq!(cells[4], GridCell {
            start: wall(6, 0, 0),
            end: wall(6, 1, 0),
            cell_type: CellType::Hour(0),
            day_index: 0,
        });
        let last = cells.last().unwrap();
        assert_eq!((last.cell_type, last.day_index), (CellType::Hour(23), 1));
        assert_eq!(last.start, wall(7, 23, 0));
    }

    #[test]
    fn test_cells_clamped_to_grid_end() {
        let cells = GridCellEngine::build_cells(wall(6, 0, 0), wall(6, 12, 0), 1);
        assert_eq!(cells[0].end, wall(6, 12, 0));
        let late = cells.iter().find(|c| c.cell_type == CellType::Hour(18)).unwrap();
        assert_eq!(late.end, late.start);
    }

    #[test]
    fn test_build_cells_is_repeatable() {
        let a = GridCellEngine::build_cells(wall(6, 0, 0), wall(13, 0, 0), 7);
        let b = GridCellEngine::build_cells(wall(6, 0, 0), wall(13, 0, 0), 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_each_event_admitted_to_one_row() {
        let all_day = Event::builder()
            .id(1)
            .start(EventTime::floating(wall(6, 0, 0)))
            .end(EventTime::floating(wall(6, 23, 59)))
            .all_day(true)
            .build();
        let multi = timed(2, wall(5, 22, 0), wall(7, 1, 0));
        let simple = timed(3, wall(6, 9, 0), wall(6, 10, 0));
        let instant = Event::builder()
            .id(4)
            .start(EventTime::floating(wall(6, 9, 0)))
            .end(EventTime::floating(wall(6, 9, 0)))
            .all_day(true)
            .build();

        for event in [&all_day, &multi, &simple, &instant] {
            let admitted = [CellType::AllDay, CellType::MultiDay, CellType::Hour(9)]
                .iter()
                .filter(|t| !GridCellEngine::skip_item_in_cell(event, **t, None))
                .count();
            assert_eq!(admitted, 1, "event {}", event.id);
        }
    }

    #[test]
    fn test_zero_duration_all_day_flag_goes_to_hour_row() {
        let event = Event::builder()
            .id(1)
            .start(EventTime::floating(wall(6, 0, 0)))
            .end(EventTime::floating(wall(6, 0, 0)))
            .all_day(true)
            .build();

        assert!(GridCellEngine::skip_item_in_cell(&event, CellType::AllDay, None));
        assert!(GridCellEngine::skip_item_in_cell(&event, CellType::MultiDay, None));
        assert!(!GridCellEngine::skip_item_in_cell(&event, CellType::Hour(0), None));
    }

    #[test]
    fn test_place_fills_cells_from_day_buckets() {
        let events = vec![
            timed(1, wall(6, 9, 0), wall(6, 10, 0)),
            timed(2, wall(6, 9, 15), wall(6, 9, 45)),
            timed(3, wall(5, 22, 0), wall(7, 1, 0)),
            timed(4, wall(6, 14, 0), wall(6, 15, 0)),
        ];
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let buckets = DayBucketClassifier::new().classify_date(&events, monday, None);

        let cells = GridCellEngine::build_cells(wall(6, 0, 0), wall(7, 0, 0), 1);
        let placed = GridCellEngine::place(&cells, &[buckets], None);

        let ids_in = |cell_type: CellType| -> Vec<i64> {
            placed
                .iter()
                .find(|p| p.cell.cell_type == cell_type)
                .map(|p| p.events.iter().map(|e| e.id).collect())
                .unwrap_or_default()
        };
        assert_eq!(ids_in(CellType::MultiDay), vec![3]);
        assert_eq!(ids_in(CellType::Hour(9)), vec![1, 2]);
        assert_eq!(ids_in(CellType::Hour(14)), vec![4]);
        assert!(ids_in(CellType::AllDay).is_empty());
        assert!(ids_in(CellType::Hour(22)).is_empty());
    }
}
