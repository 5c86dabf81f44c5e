//! Error types for the sarima-search library.

use thiserror::Error;

/// Result type alias for search and model operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Fatal errors surfaced to the caller.
///
/// Per-candidate estimation failures during a grid search are *not*
/// represented here; they are collected as [`FitFailure`] diagnostics and
/// the affected candidate is simply absent from the ranked table.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Input series is empty.
    #[error("empty input series")]
    EmptyData,

    /// Series too short for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parameter ranges produced no candidates after the complexity filter.
    #[error("no candidate specifications after applying complexity cap {cap}")]
    EmptyGrid { cap: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// NaN or infinite values in the input series.
    #[error("non-finite values in input series")]
    MissingValues,

    /// Malformed period label (expected `YYYY-MM`).
    #[error("invalid period label: {0}")]
    PeriodError(String),

    /// A directly requested model fit failed.
    ///
    /// Only produced when a single model is fitted explicitly; the grid
    /// search intercepts [`FitFailure`] before it reaches this level.
    #[error("estimation failed: {0}")]
    Estimation(#[from] FitFailure),

    /// Malformed input or result file.
    #[error("format error: {0}")]
    FormatError(String),

    /// Underlying CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why one candidate's estimation failed.
///
/// Routine and recoverable: the search drops the candidate and continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitFailure {
    /// Series shorter than the minimum this specification requires.
    #[error("insufficient data for orders: need at least {needed}, got {got}")]
    TooShort { needed: usize, got: usize },

    /// Optimizer failed to converge on coefficient estimates.
    #[error("coefficient estimation did not converge")]
    NonConvergence,

    /// Likelihood or score came out NaN/infinite.
    #[error("non-finite fit score")]
    NonFiniteScore,

    /// Not enough degrees of freedom for the bias-corrected criterion.
    #[error("degenerate degrees of freedom: n={n}, k={k}")]
    DegenerateDof { n: usize, k: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = SearchError::EmptyData;
        assert_eq!(err.to_string(), "empty input series");

        let err = SearchError::InsufficientData { needed: 52, got: 40 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 52, got 40"
        );

        let err = SearchError::EmptyGrid { cap: 0 };
        assert_eq!(
            err.to_string(),
            "no candidate specifications after applying complexity cap 0"
        );

        let err = SearchError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn fit_failures_are_clonable_and_comparable() {
        let f1 = FitFailure::NonConvergence;
        let f2 = f1.clone();
        assert_eq!(f1, f2);
        assert_ne!(f1, FitFailure::NonFiniteScore);
    }
}
