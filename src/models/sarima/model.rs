//! Seasonal ARIMA estimation by conditional sum of squares.

use crate::core::{Forecast, Series};
use crate::error::{FitFailure, Result, SearchError};
use crate::models::sarima::diff::{
    apply_differencing, differencing_polynomial, poly_mul, undo_differencing,
};
use crate::models::sarima::spec::SarimaSpec;
use crate::models::Forecaster;
use crate::optim::NelderMead;
use crate::stats::quantile_normal;

/// SARIMA(p,d,q)(P,D,Q)[s] model with no drift term.
///
/// Estimation expands the seasonal and non-seasonal AR and MA lag
/// polynomials into full lag-weight vectors and minimizes the conditional
/// sum of squared one-step errors on the differenced scale. That matches
/// the selection setting this crate exists for: thousands of short fits
/// whose AICc values are compared against each other.
#[derive(Debug, Clone)]
pub struct Sarima {
    spec: SarimaSpec,
    /// Non-seasonal AR coefficients.
    ar: Vec<f64>,
    /// Non-seasonal MA coefficients.
    ma: Vec<f64>,
    /// Seasonal AR coefficients.
    seasonal_ar: Vec<f64>,
    /// Seasonal MA coefficients.
    seasonal_ma: Vec<f64>,
    /// Expanded AR lag weights (index = lag - 1).
    phi: Vec<f64>,
    /// Expanded MA lag weights (index = lag - 1).
    theta: Vec<f64>,
    /// Original series (seeds integration when forecasting).
    history: Option<Vec<f64>>,
    /// Differenced training series.
    differenced: Option<Vec<f64>>,
    /// One-step fitted values on the differenced scale.
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    sigma2: Option<f64>,
    log_likelihood: Option<f64>,
    aic: Option<f64>,
    aicc: Option<f64>,
    bic: Option<f64>,
}

impl Sarima {
    pub fn new(spec: SarimaSpec) -> Self {
        Self {
            spec,
            ar: vec![],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
            phi: vec![],
            theta: vec![],
            history: None,
            differenced: None,
            fitted: None,
            residuals: None,
            sigma2: None,
            log_likelihood: None,
            aic: None,
            aicc: None,
            bic: None,
        }
    }

    pub fn spec(&self) -> SarimaSpec {
        self.spec
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.seasonal_ar
    }

    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.seasonal_ma
    }

    /// Residual variance estimate.
    pub fn sigma2(&self) -> Option<f64> {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.log_likelihood
    }

    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bias-corrected information criterion, the search's ranking score.
    pub fn aicc(&self) -> Option<f64> {
        self.aicc
    }

    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Fit the model, reporting failures as [`FitFailure`].
    ///
    /// The grid search calls this directly so that per-candidate failures
    /// stay recoverable; [`Forecaster::fit`] wraps it for callers fitting a
    /// single chosen model.
    pub fn fit_css(&mut self, series: &Series) -> std::result::Result<(), FitFailure> {
        let values = series.values();
        let needed = self.spec.min_observations();
        if values.len() < needed {
            return Err(FitFailure::TooShort {
                needed,
                got: values.len(),
            });
        }

        let spec = self.spec;
        let w = apply_differencing(values, spec.d, spec.sd, spec.period);
        let burn_in = spec.burn_in();
        let n_eff = w.len() - burn_in;
        let k = spec.num_coefficients();

        let coefficients = if k == 0 {
            vec![]
        } else {
            // Small same-sign starting values, shrinking with lag, keep the
            // initial simplex inside the invertibility box.
            let initial: Vec<f64> = (0..k).map(|i| 0.1 / (i + 1) as f64).collect();
            let optimizer = NelderMead {
                max_iter: 2000,
                tolerance: 1e-8,
                bounds: vec![(-0.99, 0.99); k],
                ..Default::default()
            };
            let result = optimizer.minimize(
                |params| {
                    let (phi, theta) = expand_operators(&spec, params);
                    conditional_sum_of_squares(&w, burn_in, &phi, &theta)
                },
                &initial,
            );
            if !result.value.is_finite() {
                return Err(FitFailure::NonFiniteScore);
            }
            if !result.converged {
                return Err(FitFailure::NonConvergence);
            }
            result.point
        };

        let (phi, theta) = expand_operators(&spec, &coefficients);
        let (fitted, residuals) = one_step_predictions(&w, burn_in, &phi, &theta);
        let css: f64 = residuals[burn_in..].iter().map(|e| e * e).sum();
        let sigma2 = css / n_eff as f64;
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(FitFailure::NonFiniteScore);
        }

        // Gaussian log-likelihood at the CSS optimum.
        let n = n_eff as f64;
        let ll = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + sigma2.ln() + 1.0);

        // Coefficients plus the innovation variance.
        let k_total = k + 1;
        let dof = n_eff as i64 - k_total as i64 - 1;
        if dof <= 0 {
            return Err(FitFailure::DegenerateDof { n: n_eff, k: k_total });
        }
        let aic = -2.0 * ll + 2.0 * k_total as f64;
        let aicc = aic + (2.0 * k_total as f64 * (k_total as f64 + 1.0)) / dof as f64;
        let bic = -2.0 * ll + k_total as f64 * n.ln();

        let (p, q, sp, sq) = (spec.p, spec.q, spec.sp, spec.sq);
        self.ar = coefficients[..p].to_vec();
        self.ma = coefficients[p..p + q].to_vec();
        self.seasonal_ar = coefficients[p + q..p + q + sp].to_vec();
        self.seasonal_ma = coefficients[p + q + sp..p + q + sp + sq].to_vec();
        self.phi = phi;
        self.theta = theta;
        self.history = Some(values.to_vec());
        self.differenced = Some(w);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.sigma2 = Some(sigma2);
        self.log_likelihood = Some(ll);
        self.aic = Some(aic);
        self.aicc = Some(aicc);
        self.bic = Some(bic);
        Ok(())
    }
}

/// Expand `(φ, θ, Φ, Θ)` into full lag-weight vectors.
///
/// The AR operator `(1 - Σφ_i B^i)(1 - ΣΦ_j B^{js})` becomes weights such
/// that `w_t = Σ phi_l w_{t-l} + ...`; the MA operator
/// `(1 + Σθ_i B^i)(1 + ΣΘ_j B^{js})` becomes weights on past errors.
fn expand_operators(spec: &SarimaSpec, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let (p, q, sp, sq, s) = (spec.p, spec.q, spec.sp, spec.sq, spec.period);
    let ar = &params[..p];
    let ma = &params[p..p + q];
    let sar = &params[p + q..p + q + sp];
    let sma = &params[p + q + sp..p + q + sp + sq];

    let mut ar_poly = vec![1.0];
    ar_poly.extend(ar.iter().map(|c| -c));
    let mut sar_poly = vec![0.0; sp * s + 1];
    sar_poly[0] = 1.0;
    for (j, &c) in sar.iter().enumerate() {
        sar_poly[(j + 1) * s] = -c;
    }
    let full_ar = poly_mul(&ar_poly, &sar_poly);
    let phi: Vec<f64> = full_ar[1..].iter().map(|c| -c).collect();

    let mut ma_poly = vec![1.0];
    ma_poly.extend_from_slice(ma);
    let mut sma_poly = vec![0.0; sq * s + 1];
    sma_poly[0] = 1.0;
    for (j, &c) in sma.iter().enumerate() {
        sma_poly[(j + 1) * s] = c;
    }
    let full_ma = poly_mul(&ma_poly, &sma_poly);
    let theta: Vec<f64> = full_ma[1..].to_vec();

    (phi, theta)
}

/// One-step predictions and residuals on the differenced scale.
///
/// Errors before `burn_in` are pinned to zero (conditional likelihood).
fn one_step_predictions(
    w: &[f64],
    burn_in: usize,
    phi: &[f64],
    theta: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    let n = w.len();
    let mut fitted = vec![f64::NAN; n];
    let mut errors = vec![0.0; n];

    for t in burn_in..n {
        let mut pred = 0.0;
        for (i, &coef) in phi.iter().enumerate() {
            pred += coef * w[t - 1 - i];
        }
        for (j, &coef) in theta.iter().enumerate() {
            pred += coef * errors[t - 1 - j];
        }
        fitted[t] = pred;
        errors[t] = w[t] - pred;
    }
    (fitted, errors)
}

fn conditional_sum_of_squares(w: &[f64], burn_in: usize, phi: &[f64], theta: &[f64]) -> f64 {
    let (_, errors) = one_step_predictions(w, burn_in, phi, theta);
    let css: f64 = errors[burn_in..].iter().map(|e| e * e).sum();
    if css.is_finite() {
        css
    } else {
        f64::MAX
    }
}

impl Forecaster for Sarima {
    fn fit(&mut self, series: &Series) -> Result<()> {
        self.fit_css(series).map_err(|failure| match failure {
            FitFailure::TooShort { needed, got } => {
                SearchError::InsufficientData { needed, got }
            }
            other => SearchError::Estimation(other),
        })
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let history = self.history.as_ref().ok_or(SearchError::FitRequired)?;
        let w = self.differenced.as_ref().ok_or(SearchError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(SearchError::FitRequired)?;
        if horizon == 0 {
            return Ok(Forecast::default());
        }

        // Recursive forecast on the differenced scale; future errors are 0.
        let mut extended = w.clone();
        let mut errors = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = 0.0;
            for (i, &coef) in self.phi.iter().enumerate() {
                if t > i {
                    pred += coef * extended[t - 1 - i];
                }
            }
            for (j, &coef) in self.theta.iter().enumerate() {
                if t > j {
                    pred += coef * errors[t - 1 - j];
                }
            }
            extended.push(pred);
            errors.push(0.0);
        }
        let forecast_diff = &extended[w.len()..];

        let poly = differencing_polynomial(self.spec.d, self.spec.sd, self.spec.period);
        Ok(Forecast::from_point(undo_differencing(
            forecast_diff,
            history,
            &poly,
        )))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let point = self.predict(horizon)?.point().to_vec();
        let sigma2 = self.sigma2.ok_or(SearchError::FitRequired)?;
        let z = quantile_normal((1.0 + level) / 2.0);

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &p) in point.iter().enumerate() {
            // Normal approximation with variance growing linearly in the
            // horizon; adequate for comparing candidates, not for pricing.
            let se = (sigma2 * (h + 1) as f64).sqrt();
            lower.push(p - z * se);
            upper.push(p + z * se);
        }
        Ok(Forecast::with_intervals(point, lower, upper))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Month;

    fn monthly(values: Vec<f64>) -> Series {
        Series::new(Month::new(2005, 1).unwrap(), values).unwrap()
    }

    fn seasonal_series(n: usize) -> Series {
        let values: Vec<f64> = (0..n)
            .map(|i| {
                120.0
                    + 0.4 * i as f64
                    + 15.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
                    + ((i * 7) % 5) as f64 * 0.3
            })
            .collect();
        monthly(values)
    }

    #[test]
    fn fits_airline_style_specification() {
        let series = seasonal_series(120);
        let spec = SarimaSpec::new(0, 1, 1, 0, 1, 1, 12);
        let mut model = Sarima::new(spec);
        model.fit_css(&series).unwrap();

        assert_eq!(model.ma_coefficients().len(), 1);
        assert_eq!(model.seasonal_ma_coefficients().len(), 1);
        assert!(model.aicc().unwrap().is_finite());
        assert!(model.sigma2().unwrap() > 0.0);
    }

    #[test]
    fn aicc_exceeds_aic() {
        let series = seasonal_series(100);
        let mut model = Sarima::new(SarimaSpec::new(1, 0, 1, 0, 1, 0, 12));
        model.fit_css(&series).unwrap();
        assert!(model.aicc().unwrap() > model.aic().unwrap());
    }

    #[test]
    fn zero_order_specification_fits_without_optimization() {
        let series = seasonal_series(60);
        let mut model = Sarima::new(SarimaSpec::new(0, 0, 0, 0, 1, 0, 12));
        model.fit_css(&series).unwrap();
        assert!(model.ar_coefficients().is_empty());
        assert!(model.aicc().unwrap().is_finite());
    }

    #[test]
    fn short_series_reports_too_short() {
        let series = monthly(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut model = Sarima::new(SarimaSpec::new(2, 1, 2, 1, 1, 1, 12));
        assert!(matches!(
            model.fit_css(&series),
            Err(FitFailure::TooShort { .. })
        ));
    }

    #[test]
    fn fit_is_deterministic() {
        let series = seasonal_series(100);
        let spec = SarimaSpec::new(1, 1, 1, 0, 1, 1, 12);
        let mut a = Sarima::new(spec);
        let mut b = Sarima::new(spec);
        a.fit_css(&series).unwrap();
        b.fit_css(&series).unwrap();
        assert_eq!(a.aicc(), b.aicc());
        assert_eq!(a.ar_coefficients(), b.ar_coefficients());
    }

    #[test]
    fn forecast_tracks_seasonal_shape() {
        let series = seasonal_series(132);
        let mut model = Sarima::new(SarimaSpec::new(0, 1, 1, 0, 1, 1, 12));
        model.fit_css(&series).unwrap();

        let forecast = model.predict(12).unwrap();
        assert_eq!(forecast.horizon(), 12);
        // One full cycle ahead should land near one cycle of drift above the
        // last observed year.
        let last_year = &series.values()[120..132];
        for (f, y) in forecast.point().iter().zip(last_year) {
            assert!((f - y).abs() < 25.0, "forecast {f} too far from {y}");
        }
    }

    #[test]
    fn requires_fit_before_prediction() {
        let model = Sarima::new(SarimaSpec::new(1, 0, 0, 0, 0, 0, 12));
        assert!(matches!(model.predict(4), Err(SearchError::FitRequired)));
    }

    #[test]
    fn intervals_bracket_point_forecasts() {
        let series = seasonal_series(120);
        let mut model = Sarima::new(SarimaSpec::new(1, 1, 0, 0, 1, 1, 12));
        model.fit_css(&series).unwrap();
        let forecast = model.predict_with_intervals(6, 0.95).unwrap();
        let (point, lower, upper) = (
            forecast.point(),
            forecast.lower().unwrap(),
            forecast.upper().unwrap(),
        );
        for i in 0..6 {
            assert!(lower[i] < point[i] && point[i] < upper[i]);
        }
        // Interval width grows with horizon.
        assert!(upper[5] - lower[5] > upper[0] - lower[0]);
    }

    #[test]
    fn expanded_operators_multiply_polynomials() {
        let spec = SarimaSpec::new(1, 0, 0, 1, 0, 0, 4);
        // φ1 = 0.5, Φ1 = 0.4:
        // (1 - 0.5B)(1 - 0.4B^4) = 1 - 0.5B - 0.4B^4 + 0.2B^5
        let (phi, theta) = expand_operators(&spec, &[0.5, 0.4]);
        assert_eq!(phi.len(), 5);
        assert!((phi[0] - 0.5).abs() < 1e-12);
        assert!((phi[3] - 0.4).abs() < 1e-12);
        assert!((phi[4] + 0.2).abs() < 1e-12);
        assert!(theta.is_empty());
    }
}
