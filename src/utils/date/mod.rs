// Date utility functions

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

pub fn is_same_day(date1: NaiveDateTime, date2: NaiveDateTime) -> bool {
    date1.date() == date2.date()
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

pub fn minute_of_day(time: NaiveDateTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Calculate the start of the week containing the given date.
///
/// # Arguments
/// * `date` - The date to find the week start for
/// * `first_day_of_week` - 0 = Sunday, 1 = Monday, etc.
pub fn get_week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    date - Duration::days(week_column(date, first_day_of_week) as i64)
}

/// Column (0-6) of `date` in a week grid starting on `first_day_of_week`.
pub fn week_column(date: NaiveDate, first_day_of_week: u8) -> u32 {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    ((weekday - first_day_of_week as i64).rem_euclid(7)) as u32
}

/// First visible day of a month grid: the week start on or before the 1st.
pub fn month_grid_start(year: i32, month: u32, first_day_of_week: u8) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| get_week_start(first, first_day_of_week))
}

/// Last day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Number of week rows needed to show every day of the month.
pub fn month_week_rows(year: i32, month: u32, first_day_of_week: u8) -> Option<u32> {
    let grid_start = month_grid_start(year, month, first_day_of_week)?;
    let last = last_day_of_month(year, month)?;
    let days = (last - grid_start).num_days() + 1;
    Some(((days + 6) / 7) as u32)
}
