//! Shared statistics helpers.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator). Zero when fewer than two points.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Autocorrelation of `values` at lag `k` (biased denominator, the usual
/// ACF convention).
pub fn autocorrelation(values: &[f64], k: usize) -> f64 {
    let n = values.len();
    if n == 0 || k >= n {
        return f64::NAN;
    }
    let m = mean(values);
    let denom: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if denom == 0.0 {
        return 0.0;
    }
    let num: f64 = values
        .iter()
        .skip(k)
        .zip(values.iter())
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    num / denom
}

/// Quantile of the standard normal distribution.
pub fn quantile_normal(p: f64) -> f64 {
    // Normal::new only fails for invalid mean/sd, which 0/1 are not.
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf(p.clamp(1e-12, 1.0 - 1e-12))
}

/// Survival function of the chi-squared distribution with `df` degrees of
/// freedom, i.e. `P(X > x)`.
pub fn chi_squared_sf(x: f64, df: usize) -> f64 {
    if !x.is_finite() || x <= 0.0 {
        return 1.0;
    }
    match ChiSquared::new(df.max(1) as f64) {
        Ok(dist) => (1.0 - dist.cdf(x)).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
