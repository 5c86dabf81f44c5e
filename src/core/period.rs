//! Calendar month handling for monthly-sampled series.

use crate::error::{Result, SearchError};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A calendar month, the sampling unit of every series in this crate.
///
/// Internally pinned to the first day of the month so that `chrono` handles
/// year rollover and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Create a month from calendar year and month number (1-12).
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or_else(|| SearchError::PeriodError(format!("{year:04}-{month:02}")))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The month `n` steps after this one.
    pub fn add_months(&self, n: usize) -> Month {
        let total = self.0.year() as i64 * 12 + self.0.month() as i64 - 1 + n as i64;
        let year = (total.div_euclid(12)) as i32;
        let month = (total.rem_euclid(12)) as u32 + 1;
        // In range by construction: month is always 1-12.
        Month(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    }

    /// Number of months from `earlier` to `self`; None if `earlier` is later.
    pub fn months_since(&self, earlier: &Month) -> Option<usize> {
        let a = self.0.year() as i64 * 12 + self.0.month() as i64;
        let b = earlier.0.year() as i64 * 12 + earlier.0.month() as i64;
        if a >= b {
            Some((a - b) as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

impl FromStr for Month {
    type Err = SearchError;

    /// Parse a `YYYY-MM` period label.
    fn from_str(s: &str) -> Result<Self> {
        let err = || SearchError::PeriodError(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = y.parse().map_err(|_| err())?;
        let month: u32 = m.parse().map_err(|_| err())?;
        Month::new(year, month).map_err(|_| err())
    }
}
