// View Types
// Calendar view modes the layout engine can render

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar view types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewType {
    /// Number of day columns in a time grid for this view
    pub fn day_count(self) -> u32 {
        match self {
            ViewType::Day => 1,
            ViewType::Week | ViewType::Month => 7,
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViewType::Day => "day",
            ViewType::Week => "week",
            ViewType::Month => "month",
        };
        f.write_str(label)
    }
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ViewType::Day),
            "week" => Ok(ViewType::Week),
            "month" => Ok(ViewType::Month),
            other => Err(format!("Unknown view type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_type() {
        assert_eq!("Day".parse::<ViewType>(), Ok(ViewType::Day));
        assert_eq!(" month ".parse::<ViewType>(), Ok(ViewType::Month));
        assert!("agenda".parse::<ViewType>().is_err());
    }

    #[test]
    fn test_day_count() {
        assert_eq!(ViewType::Day.day_count(), 1);
        assert_eq!(ViewType::Week.day_count(), 7);
    }
}
