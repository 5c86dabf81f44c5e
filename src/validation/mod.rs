//! Pre-fit and post-fit statistical checks.

mod stationarity;

pub use residual_tests::{jarque_bera, ljung_box, JarqueBeraResult, LjungBoxResult};
pub use stationarity::{
    adf_test, kpss_test, test_stationarity, StationarityResult, StationarityVerdict,
};
