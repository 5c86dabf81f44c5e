//! Forecast result structure.

/// Point forecasts with optional prediction intervals, one value per
/// monthly step ahead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Point-only forecast.
    pub fn from_point(point: Vec<f64>) -> Self {
        Self {
            point,
            lower: None,
            upper: None,
        }
    }

    /// Forecast with symmetric-confidence interval bounds.
    pub fn with_intervals(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        debug_assert_eq!(point.len(), lower.len());
        debug_assert_eq!(point.len(), upper.len());
        Self {
            point,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Number of steps ahead.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_only_forecast_has_no_intervals() {
        let f = Forecast::from_point(vec![1.0, 2.0, 3.0]);
        assert_eq!(f.horizon(), 3);
        assert!(!f.has_intervals());
        assert!(f.lower().is_none());
    }

    #[test]
    fn intervals_are_exposed() {
        let f = Forecast::with_intervals(vec![2.0], vec![1.0], vec![3.0]);
        assert!(f.has_intervals());
        assert_eq!(f.lower().unwrap(), &[1.0]);
        assert_eq!(f.upper().unwrap(), &[3.0]);
    }

    #[test]
    fn empty_forecast() {
        let f = Forecast::from_point(vec![]);
        assert!(f.is_empty());
        assert_eq!(f.horizon(), 0);
    }
}
