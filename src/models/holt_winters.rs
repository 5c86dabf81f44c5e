//! Holt-Winters triple exponential smoothing.
//!
//! The seasonal exponential-smoothing family serves as a cross-check on
//! the SARIMA candidates: both report AICc, so the two families can be
//! ranked on the same scale.

use crate::core::{Forecast, Series};
use crate::error::{Result, SearchError};
use crate::models::Forecaster;
use crate::optim::NelderMead;
use crate::stats::quantile_normal;

const PARAM_MIN: f64 = 0.0001;
const PARAM_MAX: f64 = 0.9999;

/// How the seasonal component enters the observation equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonalKind {
    /// `y_t = l_t + b_t + s_t + e_t`
    #[default]
    Additive,
    /// `y_t = (l_t + b_t) * s_t + e_t`
    Multiplicative,
}

/// Holt-Winters forecaster.
///
/// Additive update equations:
/// - level: `l_t = α(y_t − s_{t−m}) + (1−α)(l_{t−1} + b_{t−1})`
/// - trend: `b_t = β(l_t − l_{t−1}) + (1−β)b_{t−1}`
/// - seasonal: `s_t = γ(y_t − l_t) + (1−γ)s_{t−m}`
///
/// Multiplicative replaces subtraction by division in the level and
/// seasonal updates. Smoothing parameters are either fixed at
/// construction or found by minimizing the in-sample sum of squared
/// one-step errors.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    alpha: Option<f64>,
    beta: Option<f64>,
    gamma: Option<f64>,
    period: usize,
    kind: SeasonalKind,
    optimize: bool,
    level: Option<f64>,
    trend: Option<f64>,
    seasonals: Option<Vec<f64>>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aicc: Option<f64>,
    n: usize,
}

impl HoltWinters {
    /// Model with fixed smoothing parameters.
    pub fn new(alpha: f64, beta: f64, gamma: f64, period: usize, kind: SeasonalKind) -> Self {
        Self {
            alpha: Some(alpha.clamp(PARAM_MIN, PARAM_MAX)),
            beta: Some(beta.clamp(PARAM_MIN, PARAM_MAX)),
            gamma: Some(gamma.clamp(PARAM_MIN, PARAM_MAX)),
            period,
            kind,
            optimize: false,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            aicc: None,
            n: 0,
        }
    }

    pub fn additive(alpha: f64, beta: f64, gamma: f64, period: usize) -> Self {
        Self::new(alpha, beta, gamma, period, SeasonalKind::Additive)
    }

    pub fn multiplicative(alpha: f64, beta: f64, gamma: f64, period: usize) -> Self {
        Self::new(alpha, beta, gamma, period, SeasonalKind::Multiplicative)
    }

    /// Model whose smoothing parameters are chosen during `fit`.
    pub fn auto(period: usize, kind: SeasonalKind) -> Self {
        Self {
            alpha: None,
            beta: None,
            gamma: None,
            period,
            kind,
            optimize: true,
            level: None,
            trend: None,
            seasonals: None,
            fitted: None,
            residuals: None,
            residual_variance: None,
            aicc: None,
            n: 0,
        }
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn kind(&self) -> SeasonalKind {
        self.kind
    }

    pub fn seasonals(&self) -> Option<&[f64]> {
        self.seasonals.as_deref()
    }

    /// Bias-corrected information criterion, comparable with the SARIMA
    /// candidates' scores.
    pub fn aicc(&self) -> Option<f64> {
        self.aicc
    }

    /// Level, trend, and seasonal indices from the first season(s).
    fn initialize_state(values: &[f64], period: usize, kind: SeasonalKind) -> (f64, f64, Vec<f64>) {
        let first_season = &values[..period];
        let level = first_season.iter().sum::<f64>() / period as f64;

        let trend = if values.len() >= 2 * period {
            let sum: f64 = (0..period)
                .map(|i| (values[period + i] - values[i]) / period as f64)
                .sum();
            sum / period as f64
        } else {
            0.0
        };

        let mut seasonals: Vec<f64> = match kind {
            SeasonalKind::Additive => first_season.iter().map(|y| y - level).collect(),
            SeasonalKind::Multiplicative => first_season
                .iter()
                .map(|y| if level.abs() > 1e-10 { y / level } else { 1.0 })
                .collect(),
        };
        Self::normalize_seasonals(&mut seasonals, kind);

        (level, trend, seasonals)
    }

    /// Additive seasonals sum to zero; multiplicative ones average to one.
    fn normalize_seasonals(seasonals: &mut [f64], kind: SeasonalKind) {
        let period = seasonals.len();
        if period == 0 {
            return;
        }
        match kind {
            SeasonalKind::Additive => {
                let adjustment = seasonals.iter().sum::<f64>() / period as f64;
                for s in seasonals.iter_mut() {
                    *s -= adjustment;
                }
            }
            SeasonalKind::Multiplicative => {
                let mean = seasonals.iter().sum::<f64>() / period as f64;
                if mean.abs() > 1e-10 {
                    for s in seasonals.iter_mut() {
                        *s /= mean;
                    }
                }
            }
        }
    }

    fn one_step(level: f64, trend: f64, s: f64, kind: SeasonalKind) -> f64 {
        match kind {
            SeasonalKind::Additive => level + trend + s,
            SeasonalKind::Multiplicative => (level + trend) * s,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn update_state(
        y: f64,
        level: &mut f64,
        trend: &mut f64,
        seasonals: &mut [f64],
        season_idx: usize,
        alpha: f64,
        beta: f64,
        gamma: f64,
        kind: SeasonalKind,
    ) {
        let s = seasonals[season_idx];
        let level_prev = *level;
        match kind {
            SeasonalKind::Additive => {
                *level = alpha * (y - s) + (1.0 - alpha) * (level_prev + *trend);
                *trend = beta * (*level - level_prev) + (1.0 - beta) * *trend;
                seasonals[season_idx] = gamma * (y - *level) + (1.0 - gamma) * s;
            }
            SeasonalKind::Multiplicative => {
                let deseasonalized = if s.abs() > 1e-10 { y / s } else { y };
                *level = alpha * deseasonalized + (1.0 - alpha) * (level_prev + *trend);
                *trend = beta * (*level - level_prev) + (1.0 - beta) * *trend;
                if level.abs() > 1e-10 {
                    seasonals[season_idx] = gamma * (y / *level) + (1.0 - gamma) * s;
                }
            }
        }
    }

    /// In-sample sum of squared one-step errors for fixed parameters.
    fn sum_of_squared_errors(
        values: &[f64],
        alpha: f64,
        beta: f64,
        gamma: f64,
        period: usize,
        kind: SeasonalKind,
    ) -> f64 {
        if values.len() < period {
            return f64::MAX;
        }
        let (mut level, mut trend, mut seasonals) = Self::initialize_state(values, period, kind);
        let mut sse = 0.0;
        for (t, &y) in values.iter().enumerate().skip(period) {
            let season_idx = t % period;
            let prediction = Self::one_step(level, trend, seasonals[season_idx], kind);
            let error = y - prediction;
            sse += error * error;
            Self::update_state(
                y, &mut level, &mut trend, &mut seasonals, season_idx, alpha, beta, gamma, kind,
            );
        }
        sse
    }

    fn optimize_params(values: &[f64], period: usize, kind: SeasonalKind) -> (f64, f64, f64) {
        let solver = NelderMead::bounded(vec![(PARAM_MIN, PARAM_MAX); 3]);
        let result = solver.minimize(
            |params| {
                Self::sum_of_squared_errors(values, params[0], params[1], params[2], period, kind)
            },
            &[0.3, 0.1, 0.1],
        );
        (
            result.point[0].clamp(PARAM_MIN, PARAM_MAX),
            result.point[1].clamp(PARAM_MIN, PARAM_MAX),
            result.point[2].clamp(PARAM_MIN, PARAM_MAX),
        )
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::auto(12, SeasonalKind::Additive)
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &Series) -> Result<()> {
        let values = series.values();
        if values.len() < 2 * self.period {
            return Err(SearchError::InsufficientData {
                needed: 2 * self.period,
                got: values.len(),
            });
        }

        self.n = values.len();

        if self.optimize {
            let (alpha, beta, gamma) = Self::optimize_params(values, self.period, self.kind);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
            self.gamma = Some(gamma);
        }
        let alpha = self.alpha.ok_or(SearchError::FitRequired)?;
        let beta = self.beta.ok_or(SearchError::FitRequired)?;
        let gamma = self.gamma.ok_or(SearchError::FitRequired)?;
        let period = self.period;

        let (mut level, mut trend, mut seasonals) =
            Self::initialize_state(values, period, self.kind);

        let mut fitted = Vec::with_capacity(self.n);
        let mut residuals = Vec::with_capacity(self.n);

        // The first season seeds the state and has no one-step prediction.
        for &y in values.iter().take(period) {
            fitted.push(y);
            residuals.push(0.0);
        }

        for (t, &y) in values.iter().enumerate().skip(period) {
            let season_idx = t % period;
            let prediction = Self::one_step(level, trend, seasonals[season_idx], self.kind);
            fitted.push(prediction);
            residuals.push(y - prediction);
            Self::update_state(
                y,
                &mut level,
                &mut trend,
                &mut seasonals,
                season_idx,
                alpha,
                beta,
                gamma,
                self.kind,
            );
        }

        let n_eff = self.n - period;
        if n_eff > 0 {
            let sse: f64 = residuals[period..].iter().map(|r| r * r).sum();
            let variance = sse / n_eff as f64;
            self.residual_variance = Some(variance);

            // Three smoothing parameters plus the variance.
            let k_total = 4.0;
            let dof = n_eff as f64 - k_total - 1.0;
            if variance > 0.0 && dof > 0.0 {
                let ll = -0.5
                    * n_eff as f64
                    * ((2.0 * std::f64::consts::PI).ln() + variance.ln() + 1.0);
                let aic = -2.0 * ll + 2.0 * k_total;
                self.aicc = Some(aic + (2.0 * k_total * (k_total + 1.0)) / dof);
            }
        }

        self.level = Some(level);
        self.trend = Some(trend);
        self.seasonals = Some(seasonals);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let level = self.level.ok_or(SearchError::FitRequired)?;
        let trend = self.trend.ok_or(SearchError::FitRequired)?;
        let seasonals = self.seasonals.as_ref().ok_or(SearchError::FitRequired)?;

        if horizon == 0 {
            return Ok(Forecast::default());
        }

        let point: Vec<f64> = (1..=horizon)
            .map(|h| {
                let s = seasonals[(self.n + h - 1) % self.period];
                match self.kind {
                    SeasonalKind::Additive => level + h as f64 * trend + s,
                    SeasonalKind::Multiplicative => (level + h as f64 * trend) * s,
                }
            })
            .collect();

        Ok(Forecast::from_point(point))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }
        let variance = self.residual_variance.unwrap_or(0.0);
        let z = quantile_normal((1.0 + level) / 2.0);

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, &pred) in forecast.point().iter().enumerate() {
            // Variance grows by one residual variance per season ahead.
            let seasons_ahead = h / self.period + 1;
            let se = (variance * seasons_ahead as f64).sqrt();
            lower.push(pred - z * se);
            upper.push(pred + z * se);
        }

        Ok(Forecast::with_intervals(
            forecast.point().to_vec(),
            lower,
            upper,
        ))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        match self.kind {
            SeasonalKind::Additive => "HoltWinters(additive)",
            SeasonalKind::Multiplicative => "HoltWinters(multiplicative)",
        }
    }
}
