//! Candidate grid configuration and enumeration.

use std::ops::RangeInclusive;

use crate::models::SarimaSpec;

/// Search space for SARIMA specifications.
///
/// Six independent inclusive order ranges plus the complexity cap applied
/// before any estimation. All knobs are plain values supplied by the
/// caller; there is no environment or CLI wiring.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Non-seasonal AR order range.
    pub p: RangeInclusive<usize>,
    /// Non-seasonal differencing order range.
    pub d: RangeInclusive<usize>,
    /// Non-seasonal MA order range.
    pub q: RangeInclusive<usize>,
    /// Seasonal AR order range (P).
    pub sp: RangeInclusive<usize>,
    /// Seasonal differencing order range (D).
    pub sd: RangeInclusive<usize>,
    /// Seasonal MA order range (Q).
    pub sq: RangeInclusive<usize>,
    /// Hard upper bound on `p + q + P + Q`, filtered before estimation.
    pub complexity_cap: usize,
    /// Seasonal period (12 for monthly data).
    pub period: usize,
    /// Evaluate candidates across a worker pool instead of sequentially.
    pub parallel: bool,
    /// Emit a progress notice every this many candidates (plus first and
    /// last). Zero disables periodic notices.
    pub progress_every: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        // One seasonal difference is taken as established by the domain
        // analysis, hence sd starts at 1.
        Self {
            p: 0..=5,
            d: 0..=1,
            q: 0..=5,
            sp: 0..=5,
            sd: 1..=3,
            sq: 0..=5,
            complexity_cap: 4,
            period: 12,
            parallel: false,
            progress_every: 50,
        }
    }
}

impl SearchConfig {
    /// Set the complexity cap.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.complexity_cap = cap;
        self
    }

    /// Set the seasonal period.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Enable or disable the worker pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Enumerate the Cartesian product of the six ranges, keeping only
/// combinations within the complexity cap.
///
/// Generation order is deterministic (`p` outermost, `Q` innermost) and
/// duplicate-free; it is also the tie-break order for equal scores.
pub fn candidate_grid(config: &SearchConfig) -> Vec<SarimaSpec> {
    let mut grid = Vec::new();
    for p in config.p.clone() {
        for d in config.d.clone() {
            for q in config.q.clone() {
                for sp in config.sp.clone() {
                    for sd in config.sd.clone() {
                        for sq in config.sq.clone() {
                            let spec =
                                SarimaSpec::new(p, d, q, sp, sd, sq, config.period);
                            if spec.complexity() <= config.complexity_cap {
                                grid.push(spec);
                            }
                        }
                    }
                }
            }
        }
    }
    grid
}
