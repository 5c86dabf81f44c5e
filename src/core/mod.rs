//! Core data structures: calendar months, monthly series, forecasts.

mod forecast;
mod period;
mod series;

pub use forecast::Forecast;
pub use period::Month;
pub use series::Series;
