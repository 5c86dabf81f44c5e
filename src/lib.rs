//! # sarima-search
//!
//! Exhaustive SARIMA model search for monthly time series.
//!
//! Enumerates every `(p,d,q)(P,D,Q)[12]` specification inside configured
//! order ranges, drops combinations over a complexity cap, fits each by
//! conditional sum of squares, and ranks the survivors by AICc. Comes
//! with CSV input/output, a deterministic holdout split, accuracy
//! metrics, residual diagnostics, and a Holt-Winters model for
//! cross-family comparison.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod decompose;
pub mod error;
pub mod io;
pub mod metrics;
pub mod models;
pub mod optim;
pub mod search;
pub mod stats;
pub mod validation;

pub use error::{FitFailure, Result, SearchError};

pub mod prelude {
    pub use crate::core::{Forecast, Month, Series};
    pub use crate::error::{FitFailure, Result, SearchError};
    pub use crate::models::{Forecaster, HoltWinters, Sarima, SarimaSpec, SeasonalKind};
    pub use crate::search::{candidate_grid, search, RankedTable, ScoredSpec, SearchConfig};
}
