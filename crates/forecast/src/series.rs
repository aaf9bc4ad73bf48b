//! Monthly consumption series primitives.

use core::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use spendcast_core::{DomainError, ValueObject};

/// A calendar month (`YYYY-MM`), the granularity of every series.
///
/// Ordering is chronological.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::invalid_input(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month `n` months after this one.
    pub fn plus(self, n: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }
}

impl ValueObject for Month {}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DomainError::invalid_input(format!("month must look like YYYY-MM, got {s:?}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u32 = month.parse().map_err(|_| bad())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for Month {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(value: Month) -> Self {
        value.to_string()
    }
}

/// Whole calendar months from `from` to `to` (negative when `to` is earlier).
///
/// A month only counts once its day-of-month has been reached, so
/// 2025-01-15 → 2025-02-14 is 0 months and → 2025-02-15 is 1.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months = (to.year() as i64 - from.year() as i64) * 12 + to.month() as i64
        - from.month() as i64;
    if months > 0 && to.day() < from.day() {
        months -= 1;
    } else if months < 0 && to.day() > from.day() {
        months += 1;
    }
    months
}

/// One month of a consumption trajectory.
///
/// Historical points have `consumed == projected`; projected points have
/// `consumed == 0`. `cumulative` runs across history and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionPoint {
    pub month: Month,
    pub consumed: f64,
    pub projected: f64,
    pub cumulative: f64,
    pub run_rate: f64,
}

/// True when months strictly increase (sorted, no duplicates).
pub fn is_chronological(points: &[ConsumptionPoint]) -> bool {
    points.windows(2).all(|w| w[0].month < w[1].month)
}

/// True when cumulative totals never decrease.
pub fn is_cumulative_monotone(points: &[ConsumptionPoint]) -> bool {
    points.windows(2).all(|w| w[0].cumulative <= w[1].cumulative)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plus_rolls_over_year_boundaries() {
        let m = Month::new(2024, 11).unwrap();
        assert_eq!(m.plus(0), m);
        assert_eq!(m.plus(2), Month::new(2025, 1).unwrap());
        assert_eq!(m.plus(26), Month::new(2027, 1).unwrap());
    }

    #[test]
    fn month_parses_and_displays_zero_padded() {
        let m: Month = "2025-03".parse().unwrap();
        assert_eq!(m.to_string(), "2025-03");
        assert!("2025-13".parse::<Month>().is_err());
        assert!("march".parse::<Month>().is_err());
    }

    #[test]
    fn whole_months_counts_only_completed_months() {
        assert_eq!(whole_months_between(date(2025, 1, 15), date(2025, 2, 14)), 0);
        assert_eq!(whole_months_between(date(2025, 1, 15), date(2025, 2, 15)), 1);
        assert_eq!(whole_months_between(date(2024, 6, 1), date(2025, 6, 1)), 12);
        assert_eq!(whole_months_between(date(2025, 6, 1), date(2025, 3, 1)), -3);
    }

    #[test]
    fn month_serializes_as_string() {
        let m = Month::new(2026, 4).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2026-04\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
