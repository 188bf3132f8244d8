//! Calendar helpers for monthly climate series.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ClimateError, ClimateResult};

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> ClimateResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ClimateError::Config(format!("month out of range: {}", month)));
        }
        Ok(Self { year, month })
    }

    /// Months elapsed since year 0, used for window arithmetic.
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: (ordinal.rem_euclid(12) + 1) as u32,
        }
    }

    /// The month `n` months later.
    pub fn plus_months(&self, n: usize) -> Self {
        Self::from_ordinal(self.ordinal() + n as i64)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| ClimateError::Config(format!("expected YYYY-MM, got '{}'", s)))?;
        let year = year
            .parse()
            .map_err(|_| ClimateError::Config(format!("invalid year in '{}'", s)))?;
        let month = month
            .parse()
            .map_err(|_| ClimateError::Config(format!("invalid month in '{}'", s)))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ClimateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Inclusive window of month bands; band 0 is `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct DateWindow {
    pub start: MonthKey,
    pub end: MonthKey,
}

/// Unchecked window as read from config.
#[derive(Deserialize)]
struct WindowBounds {
    start: MonthKey,
    end: MonthKey,
}

impl TryFrom<WindowBounds> for DateWindow {
    type Error = ClimateError;

    fn try_from(bounds: WindowBounds) -> ClimateResult<Self> {
        DateWindow::new(bounds.start, bounds.end)
    }
}

impl DateWindow {
    pub fn new(start: MonthKey, end: MonthKey) -> ClimateResult<Self> {
        if end < start {
            return Err(ClimateError::Config(format!(
                "date window ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of month bands covered.
    pub fn band_count(&self) -> usize {
        (self.end.ordinal() - self.start.ordinal() + 1) as usize
    }

    /// Month represented by a band index.
    pub fn band_month(&self, index: usize) -> ClimateResult<MonthKey> {
        if index >= self.band_count() {
            return Err(ClimateError::InvalidBandIndex {
                index,
                band_count: self.band_count(),
            });
        }
        Ok(self.start.plus_months(index))
    }

    /// Band index of a month, `None` outside the window.
    pub fn band_index(&self, month: MonthKey) -> Option<usize> {
        if month < self.start || month > self.end {
            return None;
        }
        Some((month.ordinal() - self.start.ordinal()) as usize)
    }
}

impl Default for DateWindow {
    /// The archive window of the monthly climate index rasters.
    fn default() -> Self {
        Self {
            start: MonthKey {
                year: 1895,
                month: 1,
            },
            end: MonthKey {
                year: 2018,
                month: 12,
            },
        }
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days per month for a year, January first. `None` assumes a non-leap year.
pub fn days_in_months(year: Option<i32>) -> [u32; 12] {
    let year = year.unwrap_or(1900);
    let mut days = [0u32; 12];
    for (i, slot) in days.iter_mut().enumerate() {
        *slot = days_in_month(year, i as u32 + 1);
    }
    days
}

/// Split `start..=end` (`YYYY-MM-DD`) into per-month inclusive date ranges.
///
/// The first range begins on `start`, the last ends on `end`.
pub fn monthly_ranges(start: &str, end: &str) -> ClimateResult<Vec<(NaiveDate, NaiveDate)>> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| ClimateError::Config(format!("invalid date '{}': {}", s, e)))
    };
    let start = parse(start)?;
    let end = parse(end)?;

    let mut ranges = Vec::new();
    let mut current = start;
    while current <= end {
        let last_day = NaiveDate::from_ymd_opt(
            current.year(),
            current.month(),
            days_in_month(current.year(), current.month()),
        )
        .ok_or_else(|| ClimateError::Internal(format!("no month end for {}", current)))?;
        let last_day = last_day.min(end);
        ranges.push((current, last_day));
        current = last_day + Duration::days(1);
    }
    Ok(ranges)
}
