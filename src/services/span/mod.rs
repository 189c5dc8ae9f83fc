//! Multi-day bar widths in week-shaped grids.

use chrono::NaiveDate;

use crate::models::grid::SpanWidth;
use crate::models::timezone::EventTime;

/// Index of the last visible day column.
pub const LAST_COLUMN: u32 = 6;
pub const DAYS_PER_WEEK: u8 = 7;

/// Stateless span calculator.
///
/// It only sizes a bar for one week row. Whether a continuation bar is
/// needed on the next row is the caller's decision; the caller re-invokes
/// with column 0 for that row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanWidthCalculator;

impl SpanWidthCalculator {
    /// Span of a bar from `start` to `end` anchored at `day_of_week_column`.
    ///
    /// Each endpoint is reduced to its own wall-clock date before the
    /// whole-day difference is taken.
    pub fn compute_span(start: &EventTime, end: &EventTime, day_of_week_column: u32) -> SpanWidth {
        Self::compute_span_dates(start.date(), end.date(), day_of_week_column)
    }

    /// Span between two calendar dates anchored at `day_of_week_column` (0-6).
    ///
    /// A column past 6 is a caller error: it trips a debug assertion and is
    /// clamped to the last column in release builds. An end date before the
    /// start date yields a single-column bar.
    pub fn compute_span_dates(start: NaiveDate, end: NaiveDate, day_of_week_column: u32) -> SpanWidth {
        debug_assert!(
            day_of_week_column <= LAST_COLUMN,
            "day_of_week_column out of range: {}",
            day_of_week_column
        );
        let column = if day_of_week_column > LAST_COLUMN {
            log::warn!(
                "Span column {} out of range, clamping to {}",
                day_of_week_column,
                LAST_COLUMN
            );
            LAST_COLUMN
        } else {
            day_of_week_column
        };

        let mut duration = (end - start).num_days().max(0);
        let remaining = (LAST_COLUMN - column) as i64;

        let overflows_week = duration > remaining;
        if overflows_week {
            duration = remaining;
        }

        let width = (duration + 1).min(DAYS_PER_WEEK as i64) as u8;
        SpanWidth {
            width,
            overflows_week,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_case::test_case;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test_case(9, 3, 4, true ; "long bar from thursday is clamped")]
    #[test_case(1, 0, 2, false ; "two day bar fits")]
    #[test_case(0, 0, 1, false ; "single day")]
    #[test_case(6, 0, 7, false ; "exactly one week")]
    #[test_case(20, 0, 7, true ; "longer than a week")]
    #[test_case(3, 3, 4, false ; "ends on last column")]
    #[test_case(4, 3, 4, true ; "one day past last column")]
    #[test_case(2, 6, 1, true ; "starts on last column")]
    fn test_compute_span(days: i64, column: u32, width: u8, overflows: bool) {
        let span = SpanWidthCalculator::compute_span_dates(monday(), monday() + Duration::days(days), column);
        assert_eq!(
            span,
            SpanWidth {
                width,
                overflows_week: overflows
            }
        );
    }

    #[test]
    fn test_compute_span_ignores_time_of_day() {
        let start = EventTime::floating(monday().and_hms_opt(23, 59, 0).unwrap());
        let end = EventTime::floating((monday() + Duration::days(1)).and_hms_opt(0, 1, 0).unwrap());
        let span = SpanWidthCalculator::compute_span(&start, &end, 0);
        assert_eq!(span.width, 2);
        assert!(!span.overflows_week);
    }

    #[test]
    fn test_inverted_dates_give_single_column() {
        let span = SpanWidthCalculator::compute_span_dates(monday(), monday() - Duration::days(2), 2);
        assert_eq!(span.width, 1);
        assert!(!span.overflows_week);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_out_of_range_column_is_clamped() {
        let span = SpanWidthCalculator::compute_span_dates(monday(), monday() + Duration::days(3), 9);
        assert_eq!(span.width, 1);
        assert!(span.overflows_week);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "day_of_week_column out of range")]
    fn test_out_of_range_column_asserts_in_debug() {
        SpanWidthCalculator::compute_span_dates(monday(), monday(), 7);
    }
}
