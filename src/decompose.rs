//! Classical seasonal-trend decomposition.
//!
//! Splits a monthly series into trend (centered moving average),
//! seasonal (normalized period means of the detrended values), and
//! remainder. Useful for eyeballing whether the seasonal difference the
//! search takes for granted is actually warranted.

use crate::core::Series;
use crate::error::{Result, SearchError};
use crate::stats::variance;

/// How the components combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecompositionKind {
    /// `y = trend + seasonal + remainder`
    #[default]
    Additive,
    /// `y = trend * seasonal * remainder`
    Multiplicative,
}

/// Components of a decomposed series, aligned with the input; trend and
/// remainder are NaN in the half-window at each end where the centered
/// moving average is undefined.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub kind: DecompositionKind,
    pub period: usize,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub remainder: Vec<f64>,
}

impl Decomposition {
    /// Share of variance explained by the seasonal component, in `[0, 1]`.
    pub fn seasonal_strength(&self) -> f64 {
        component_strength(&self.seasonal, &self.remainder)
    }

    /// Share of variance explained by the trend component, in `[0, 1]`.
    pub fn trend_strength(&self) -> f64 {
        let defined: Vec<usize> = (0..self.trend.len())
            .filter(|&i| self.trend[i].is_finite() && self.remainder[i].is_finite())
            .collect();
        let trend: Vec<f64> = defined.iter().map(|&i| self.trend[i]).collect();
        let remainder: Vec<f64> = defined.iter().map(|&i| self.remainder[i]).collect();
        component_strength(&trend, &remainder)
    }
}

fn component_strength(component: &[f64], remainder: &[f64]) -> f64 {
    let combined: Vec<f64> = component
        .iter()
        .zip(remainder)
        .filter(|(c, r)| c.is_finite() && r.is_finite())
        .map(|(c, r)| c + r)
        .collect();
    let finite_remainder: Vec<f64> = remainder.iter().copied().filter(|r| r.is_finite()).collect();
    let var_combined = variance(&combined);
    if var_combined == 0.0 {
        return 0.0;
    }
    (1.0 - variance(&finite_remainder) / var_combined).clamp(0.0, 1.0)
}

/// Decompose `series` at the given seasonal period.
///
/// Needs at least two full periods. Multiplicative decomposition
/// additionally requires strictly positive observations.
pub fn decompose(series: &Series, period: usize, kind: DecompositionKind) -> Result<Decomposition> {
    let values = series.values();
    let n = values.len();
    if period < 2 {
        return Err(SearchError::InvalidParameter(
            "seasonal period must be at least 2".to_string(),
        ));
    }
    if n < 2 * period {
        return Err(SearchError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }
    if kind == DecompositionKind::Multiplicative && values.iter().any(|v| *v <= 0.0) {
        return Err(SearchError::InvalidParameter(
            "multiplicative decomposition needs positive values".to_string(),
        ));
    }

    let trend = centered_moving_average(values, period);

    // Detrend where the trend is defined.
    let detrended: Vec<f64> = values
        .iter()
        .zip(&trend)
        .map(|(y, t)| match kind {
            DecompositionKind::Additive => y - t,
            DecompositionKind::Multiplicative => y / t,
        })
        .collect();

    // Average the detrended values per month-of-period.
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &d) in detrended.iter().enumerate() {
        if d.is_finite() {
            sums[i % period] += d;
            counts[i % period] += 1;
        }
    }
    let mut indices: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    // Normalize: additive indices sum to zero, multiplicative average to one.
    match kind {
        DecompositionKind::Additive => {
            let adjustment = indices.iter().sum::<f64>() / period as f64;
            for s in &mut indices {
                *s -= adjustment;
            }
        }
        DecompositionKind::Multiplicative => {
            let mean = indices.iter().sum::<f64>() / period as f64;
            if mean != 0.0 {
                for s in &mut indices {
                    *s /= mean;
                }
            }
        }
    }

    let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();
    let remainder: Vec<f64> = (0..n)
        .map(|i| match kind {
            DecompositionKind::Additive => values[i] - trend[i] - seasonal[i],
            DecompositionKind::Multiplicative => values[i] / (trend[i] * seasonal[i]),
        })
        .collect();

    Ok(Decomposition {
        kind,
        period,
        trend,
        seasonal,
        remainder,
    })
}

/// Centered moving average of window `period`; for even periods this is
/// the standard 2×m average. Ends are NaN.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let mut out = vec![f64::NAN; n];

    if period % 2 == 1 {
        for i in half..n - half {
            let window = &values[i - half..=i + half];
            out[i] = window.iter().sum::<f64>() / period as f64;
        }
    } else {
        for i in half..n - half {
            // 2×m MA: endpoints of the (period+1)-wide window get half weight.
            let mut sum = 0.5 * values[i - half] + 0.5 * values[i + half];
            sum += values[i - half + 1..i + half].iter().sum::<f64>();
            out[i] = sum / period as f64;
        }
    }
    out
}
