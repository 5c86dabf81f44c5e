//! Forecast accuracy metrics over a holdout window.

use crate::error::{Result, SearchError};

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(SearchError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(SearchError::InvalidParameter(format!(
            "length mismatch: {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root mean squared error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    Ok((sum / actual.len() as f64).sqrt())
}

/// Mean absolute percentage error, in percent.
///
/// Undefined when any actual is zero; returns `Ok(None)` in that case
/// rather than a silently inflated number.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<Option<f64>> {
    check_pair(actual, predicted)?;
    if actual.iter().any(|a| *a == 0.0) {
        return Ok(None);
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    Ok(Some(100.0 * sum / actual.len() as f64))
}

/// Symmetric mean absolute percentage error, in percent.
///
/// Terms where both values are zero contribute nothing.
pub fn smape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = (a.abs() + p.abs()) / 2.0;
            if denom == 0.0 {
                0.0
            } else {
                (a - p).abs() / denom
            }
        })
        .sum();
    Ok(100.0 * sum / actual.len() as f64)
}

/// Mean absolute scaled error against the in-sample seasonal naive.
///
/// The scale is the mean absolute error of the period-`period` naive
/// forecast on `train`; values below 1 beat that baseline.
pub fn mase(actual: &[f64], predicted: &[f64], train: &[f64], period: usize) -> Result<f64> {
    check_pair(actual, predicted)?;
    if period == 0 {
        return Err(SearchError::InvalidParameter(
            "seasonal period must be positive".to_string(),
        ));
    }
    if train.len() <= period {
        return Err(SearchError::InsufficientData {
            needed: period + 1,
            got: train.len(),
        });
    }
    let scale: f64 = (period..train.len())
        .map(|t| (train[t] - train[t - period]).abs())
        .sum::<f64>()
        / (train.len() - period) as f64;
    if scale == 0.0 {
        return Err(SearchError::InvalidParameter(
            "seasonal naive scale is zero".to_string(),
        ));
    }
    Ok(mae(actual, predicted)? / scale)
}
