//! Seasonal ARIMA: specification, differencing, and CSS estimation.

mod diff;
mod model;
mod spec;

pub use diff::{apply_differencing, differencing_polynomial, undo_differencing};
pub use model::Sarima;
pub use spec::SarimaSpec;
