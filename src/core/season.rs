//! Calendar date to season mapping.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Half of the year a brightness profile applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy mapping a calendar date to a season.
///
/// The month policy below is the default; callers that need a southern
/// hemisphere or custom calendar substitute their own function without
/// touching the brightness curve.
pub type SeasonStrategy = fn(NaiveDate) -> Season;

/// Northern-hemisphere month policy: April through September is summer,
/// October through March is winter. Total over all valid dates.
pub fn northern_by_month(date: NaiveDate) -> Season {
    if (4..=9).contains(&date.month()) {
        Season::Summer
    } else {
        Season::Winter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn april_through_september_is_summer() {
        for month in 4..=9 {
            assert_eq!(northern_by_month(date(2025, month, 15)), Season::Summer);
        }
    }

    #[test]
    fn october_through_march_is_winter() {
        for month in [10, 11, 12, 1, 2, 3] {
            assert_eq!(northern_by_month(date(2025, month, 15)), Season::Winter);
        }
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(northern_by_month(date(2025, 3, 31)), Season::Winter);
        assert_eq!(northern_by_month(date(2025, 4, 1)), Season::Summer);
        assert_eq!(northern_by_month(date(2025, 9, 30)), Season::Summer);
        assert_eq!(northern_by_month(date(2025, 10, 1)), Season::Winter);
    }
}
