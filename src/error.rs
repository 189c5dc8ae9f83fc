//! Error type for the layout crate.
//!
//! Layout operations are total; only the parsing and validation entry
//! points (timezones, event records, settings, calendar dates) can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("first day of week must be 0-6, got {0}")]
    InvalidWeekStart(u8),

    #[error("failed to parse settings: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
