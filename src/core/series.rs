//! Monthly series data structure.

use crate::core::period::Month;
use crate::error::{Result, SearchError};

/// A univariate monthly time series.
///
/// Immutable once constructed: a start month plus an ordered vector of
/// observations at a fixed monthly interval. All modelling code reads the
/// values slice; nothing mutates a series in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    start: Month,
    values: Vec<f64>,
}

impl Series {
    /// Create a series starting at `start`.
    ///
    /// Rejects empty input and non-finite observations up front so that
    /// downstream estimation never has to handle NaN.
    pub fn new(start: Month, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SearchError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SearchError::MissingValues);
        }
        Ok(Self { start, values })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First observed month.
    pub fn start(&self) -> Month {
        self.start
    }

    /// Month of the observation at `index`.
    pub fn month_at(&self, index: usize) -> Month {
        self.start.add_months(index)
    }

    /// Month following the last observation.
    pub fn end(&self) -> Month {
        self.start.add_months(self.values.len())
    }

    /// Observed values in temporal order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate `(month, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.start.add_months(i), v))
    }

    /// Contiguous sub-series over `[start_idx, end_idx)`.
    pub fn slice(&self, start_idx: usize, end_idx: usize) -> Result<Series> {
        if start_idx >= end_idx {
            return Err(SearchError::InvalidParameter(
                "slice start must be before end".to_string(),
            ));
        }
        if end_idx > self.values.len() {
            return Err(SearchError::InvalidParameter(format!(
                "slice end {} exceeds series length {}",
                end_idx,
                self.values.len()
            )));
        }
        Ok(Series {
            start: self.start.add_months(start_idx),
            values: self.values[start_idx..end_idx].to_vec(),
        })
    }

    /// Deterministic train/test split: training series keeps everything but
    /// the last `test_len` observations, the test series is those last
    /// `test_len`, temporal order preserved.
    ///
    /// The split index is fixed by `test_len`, never randomized.
    pub fn split_holdout(&self, test_len: usize) -> Result<(Series, Series)> {
        if test_len == 0 {
            return Err(SearchError::InvalidParameter(
                "holdout length must be positive".to_string(),
            ));
        }
        if test_len >= self.values.len() {
            return Err(SearchError::InsufficientData {
                needed: test_len + 1,
                got: self.values.len(),
            });
        }
        let split = self.values.len() - test_len;
        let train = self.slice(0, split)?;
        let test = self.slice(split, self.values.len())?;
        Ok((train, test))
    }
}
