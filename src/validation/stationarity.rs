//! Unit-root and stationarity tests.
//!
//! Used to sanity-check differencing choices before a grid run: a series
//! that is already stationary rarely needs `d > 0`, and a trending one
//! almost always does.

use crate::stats::mean;

/// Outcome of a stationarity test.
#[derive(Debug, Clone)]
pub struct StationarityResult {
    /// Test statistic; NaN when the series is too short or degenerate.
    pub statistic: f64,
    /// Approximate p-value.
    pub p_value: f64,
    /// Lags used by the test.
    pub lags: usize,
    /// Verdict at the 5% level.
    pub is_stationary: bool,
    /// `(1%, 5%, 10%)` critical values.
    pub critical_values: (f64, f64, f64),
}

impl StationarityResult {
    fn degenerate(lags: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags,
            is_stationary: false,
            critical_values: (f64::NAN, f64::NAN, f64::NAN),
        }
    }
}

/// Augmented Dickey-Fuller test with constant.
///
/// Null hypothesis: the series has a unit root. Rejection (statistic
/// below the critical value) indicates stationarity.
pub fn adf_test(values: &[f64], max_lags: Option<usize>) -> StationarityResult {
    let n = values.len();
    if n < 8 {
        return StationarityResult::degenerate(0);
    }

    // Schwert-style default lag bound.
    let max_lags = max_lags
        .unwrap_or_else(|| ((n - 1) as f64).powf(1.0 / 3.0).floor() as usize)
        .clamp(1, n / 2 - 1);

    let diff: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let level = &values[..n - 1];

    let lags = best_lag_by_aic(&diff, level, max_lags);

    let Some((beta, se)) = level_regression(&diff, level, lags) else {
        return StationarityResult::degenerate(lags);
    };
    let t_stat = beta / se;

    // MacKinnon critical values, constant / no trend.
    let critical_values = (-3.43, -2.86, -2.57);
    StationarityResult {
        statistic: t_stat,
        p_value: adf_p_value(t_stat),
        lags,
        is_stationary: t_stat < critical_values.1,
        critical_values,
    }
}

/// KPSS test for level stationarity.
///
/// Null hypothesis is the opposite of ADF's: the series IS stationary.
pub fn kpss_test(values: &[f64], lags: Option<usize>) -> StationarityResult {
    let n = values.len();
    if n < 8 {
        return StationarityResult::degenerate(0);
    }

    let lags = lags
        .unwrap_or_else(|| (4.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize)
        .clamp(1, n / 2);

    let m = mean(values);
    let residuals: Vec<f64> = values.iter().map(|v| v - m).collect();

    let mut running = 0.0;
    let mut cumsum_sq = 0.0;
    for r in &residuals {
        running += r;
        cumsum_sq += running * running;
    }
    let numerator = cumsum_sq / (n * n) as f64;

    // Bartlett-kernel long-run variance.
    let mut long_run = residuals.iter().map(|r| r * r).sum::<f64>() / n as f64;
    for j in 1..=lags {
        let weight = 1.0 - j as f64 / (lags + 1) as f64;
        let autocov: f64 = residuals
            .iter()
            .skip(j)
            .zip(residuals.iter())
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / n as f64;
        long_run += 2.0 * weight * autocov;
    }
    if long_run <= 0.0 {
        return StationarityResult::degenerate(lags);
    }

    let stat = numerator / long_run;
    let critical_values = (0.739, 0.463, 0.347);
    StationarityResult {
        statistic: stat,
        p_value: kpss_p_value(stat),
        lags,
        is_stationary: stat < critical_values.1,
        critical_values,
    }
}

/// Verdict combining both tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationarityVerdict {
    Stationary,
    NonStationary,
    Inconclusive,
}

/// Run ADF and KPSS and combine their verdicts.
pub fn test_stationarity(
    values: &[f64],
) -> (StationarityResult, StationarityResult, StationarityVerdict) {
    let adf = adf_test(values, None);
    let kpss = kpss_test(values, None);
    let verdict = match (adf.is_stationary, kpss.is_stationary) {
        (true, true) => StationarityVerdict::Stationary,
        (false, false) => StationarityVerdict::NonStationary,
        _ => StationarityVerdict::Inconclusive,
    };
    (adf, kpss, verdict)
}

/// Regression of the differenced series on the lagged level, skipping the
/// first `lag` observations. Returns the level coefficient and its
/// standard error, or None when degenerate.
fn level_regression(diff: &[f64], level: &[f64], lag: usize) -> Option<(f64, f64)> {
    let n = diff.len();
    if n <= lag + 2 || level.len() < n {
        return None;
    }
    let window = lag..n;
    let n_eff = window.len();

    let y_mean = mean(&diff[lag..]);
    let x_mean = mean(&level[lag..n]);

    let mut xx = 0.0;
    let mut xy = 0.0;
    let mut yy = 0.0;
    for i in window {
        let x = level[i] - x_mean;
        let y = diff[i] - y_mean;
        xx += x * x;
        xy += x * y;
        yy += y * y;
    }
    if xx == 0.0 {
        return None;
    }

    let beta = xy / xx;
    let rss = yy - beta * xy;
    let sigma_sq = rss / (n_eff - 2) as f64;
    if sigma_sq <= 0.0 {
        return None;
    }
    Some((beta, (sigma_sq / xx).sqrt()))
}

fn best_lag_by_aic(diff: &[f64], level: &[f64], max_lags: usize) -> usize {
    let mut best = (1, f64::INFINITY);
    for lag in 1..=max_lags {
        let aic = regression_aic(diff, level, lag);
        if aic < best.1 {
            best = (lag, aic);
        }
    }
    best.0
}

fn regression_aic(diff: &[f64], level: &[f64], lag: usize) -> f64 {
    let n = diff.len();
    if n <= lag + 2 {
        return f64::INFINITY;
    }
    let Some((beta, _)) = level_regression(diff, level, lag) else {
        return f64::INFINITY;
    };

    let n_eff = n - lag;
    let y_mean = mean(&diff[lag..]);
    let x_mean = mean(&level[lag..n]);
    let alpha = y_mean - beta * x_mean;
    let rss: f64 = (lag..n)
        .map(|i| {
            let r = diff[i] - (alpha + beta * level[i]);
            r * r
        })
        .sum();
    if rss <= 0.0 {
        return f64::INFINITY;
    }
    let k = lag + 2;
    n_eff as f64 * (rss / n_eff as f64).ln() + 2.0 * k as f64
}

/// Interpolated MacKinnon p-value, constant / no trend.
fn adf_p_value(t_stat: f64) -> f64 {
    if t_stat.is_nan() {
        return f64::NAN;
    }
    const TABLE: [(f64, f64); 8] = [
        (-4.0, 0.001),
        (-3.43, 0.01),
        (-2.86, 0.05),
        (-2.57, 0.10),
        (-1.94, 0.20),
        (-1.62, 0.30),
        (-1.28, 0.40),
        (-0.84, 0.50),
    ];
    if t_stat < TABLE[0].0 {
        return TABLE[0].1;
    }
    for window in TABLE.windows(2) {
        let (t0, p0) = window[0];
        let (t1, p1) = window[1];
        if t_stat < t1 {
            return p0 + (p1 - p0) * (t_stat - t0) / (t1 - t0);
        }
    }
    if t_stat < 0.0 {
        0.70
    } else {
        0.90 + 0.05 * (1.0 - (-t_stat).exp())
    }
}

fn kpss_p_value(stat: f64) -> f64 {
    if stat.is_nan() {
        return f64::NAN;
    }
    if stat < 0.347 {
        0.10 + 0.90 * (1.0 - stat / 0.347)
    } else if stat < 0.463 {
        0.05 + 0.05 * (0.463 - stat) / (0.463 - 0.347)
    } else if stat < 0.739 {
        0.01 + 0.04 * (0.739 - stat) / (0.739 - 0.463)
    } else {
        (0.01 * (1.0 - (stat - 0.739).min(1.0))).max(0.0)
    }
}
