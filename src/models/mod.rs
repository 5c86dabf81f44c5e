//! Forecasting models and their common interface.

pub mod holt_winters;
pub mod sarima;

use crate::core::{Forecast, Series};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// Object-safe, so heterogeneous candidates can be compared behind
/// `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a monthly series.
    fn fit(&mut self, series: &Series) -> Result<()>;

    /// Forecast `horizon` months past the end of the training series.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Forecast with prediction intervals at the given confidence level.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step predictions.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// One-step residuals.
    fn residuals(&self) -> Option<&[f64]>;

    /// Model display name.
    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

pub use holt_winters::{HoltWinters, SeasonalKind};
pub use sarima::{Sarima, SarimaSpec};
