//! Differencing for seasonal ARIMA models.
//!
//! Ordinary and seasonal differencing are handled uniformly through the
//! expanded lag polynomial `(1-B)^d (1-B^s)^D`: differencing is a dot
//! product with the polynomial coefficients, and integration (undoing the
//! differencing when forecasting) is the same recursion solved for `y_t`.

/// Multiply two lag polynomials given as coefficient vectors (index = lag).
pub(crate) fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Coefficients of `(1-B)^d (1-B^s)^D`, index = lag. Always starts with 1.
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = poly_mul(&poly, &seasonal);
        }
    }
    poly
}

/// Apply `(1-B)^d (1-B^s)^D` to a series.
///
/// The result is shorter by `d + D*s` observations; an input shorter than
/// that yields an empty vector.
pub fn apply_differencing(series: &[f64], d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let poly = differencing_polynomial(d, seasonal_d, period);
    let lags = poly.len() - 1;
    if series.len() <= lags {
        return vec![];
    }
    (lags..series.len())
        .map(|t| poly.iter().enumerate().map(|(j, &c)| c * series[t - j]).sum())
        .collect()
}

/// Reconstruct original-scale forecasts from differenced-scale forecasts.
///
/// Solves `w_t = sum_j c_j y_{t-j}` for `y_t` step by step, seeding the
/// recursion with the observed history.
pub fn undo_differencing(forecasts: &[f64], history: &[f64], poly: &[f64]) -> Vec<f64> {
    if poly.len() <= 1 {
        return forecasts.to_vec();
    }
    let mut extended = history.to_vec();
    for &w in forecasts {
        let t = extended.len();
        let mut y = w;
        for (j, &c) in poly.iter().enumerate().skip(1) {
            if t >= j {
                y -= c * extended[t - j];
            }
        }
        extended.push(y);
    }
    extended[history.len()..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polynomial_for_first_difference() {
        assert_eq!(differencing_polynomial(1, 0, 12), vec![1.0, -1.0]);
    }

    #[test]
    fn polynomial_for_seasonal_difference() {
        let poly = differencing_polynomial(0, 1, 4);
        assert_eq!(poly, vec![1.0, 0.0, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn polynomial_combines_both() {
        // (1-B)(1-B^4) = 1 - B - B^4 + B^5
        let poly = differencing_polynomial(1, 1, 4);
        assert_eq!(poly, vec![1.0, -1.0, 0.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn first_difference_matches_adjacent_deltas() {
        let series = [1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(apply_differencing(&series, 1, 0, 12), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn second_difference_of_quadratic_is_constant() {
        let series: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let diffed = apply_differencing(&series, 2, 0, 12);
        for &v in &diffed {
            assert_relative_eq!(v, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn seasonal_difference_removes_repeating_pattern() {
        // Period-4 pattern shifted up by 10 each cycle.
        let series = [
            100.0, 120.0, 80.0, 90.0, //
            110.0, 130.0, 90.0, 100.0,
        ];
        assert_eq!(
            apply_differencing(&series, 0, 1, 4),
            vec![10.0, 10.0, 10.0, 10.0]
        );
    }

    #[test]
    fn too_short_input_yields_empty() {
        let series = [1.0, 2.0, 3.0];
        assert!(apply_differencing(&series, 0, 1, 12).is_empty());
    }

    #[test]
    fn undo_reverses_apply() {
        let series: Vec<f64> = (0..24)
            .map(|i| 50.0 + 0.5 * i as f64 + ((i % 4) as f64) * 3.0)
            .collect();
        let poly = differencing_polynomial(1, 1, 4);
        let diffed = apply_differencing(&series, 1, 1, 4);

        // Feed the tail of the differenced series back through the inverse
        // recursion with the matching history prefix.
        let split = diffed.len() - 6;
        let history = &series[..series.len() - 6];
        let restored = undo_differencing(&diffed[split..], history, &poly);
        for (r, y) in restored.iter().zip(&series[series.len() - 6..]) {
            assert_relative_eq!(r, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn undo_with_identity_polynomial_is_passthrough() {
        let f = [1.0, 2.0];
        assert_eq!(undo_differencing(&f, &[9.0, 9.0], &[1.0]), vec![1.0, 2.0]);
    }
}
