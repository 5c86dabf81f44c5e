//! Exhaustive candidate evaluation and ranking.

use log::{debug, info};
use rayon::prelude::*;

use crate::core::Series;
use crate::error::{FitFailure, Result, SearchError};
use crate::models::{Sarima, SarimaSpec};

use super::grid::{candidate_grid, SearchConfig};

/// One successfully scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSpec {
    pub spec: SarimaSpec,
    /// Bias-corrected information criterion; lower is better.
    pub aicc: f64,
}

/// Candidates ranked by AICc, ascending.
///
/// Ties keep the generation order of the grid, so repeated runs on the
/// same inputs produce identical tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTable {
    rows: Vec<ScoredSpec>,
}

impl RankedTable {
    pub(crate) fn from_rows(rows: Vec<ScoredSpec>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The lowest-AICc candidate, if any survived estimation.
    pub fn best(&self) -> Option<&ScoredSpec> {
        self.rows.first()
    }

    pub fn get(&self, index: usize) -> Option<&ScoredSpec> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredSpec> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[ScoredSpec] {
        &self.rows
    }
}

impl<'a> IntoIterator for &'a RankedTable {
    type Item = &'a ScoredSpec;
    type IntoIter = std::slice::Iter<'a, ScoredSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Outcome of a full grid search.
///
/// Discarded candidates are kept with their failure reasons so callers
/// can report why parts of the grid produced no score; an empty table
/// with a populated `failures` list is a valid outcome, distinct from
/// the precondition errors `search` itself returns.
#[derive(Debug, Default)]
pub struct SearchReport {
    pub table: RankedTable,
    pub failures: Vec<(SarimaSpec, FitFailure)>,
    /// Total candidates evaluated (scored plus failed).
    pub evaluated: usize,
}

impl SearchReport {
    /// Fraction of the grid that produced a score.
    pub fn success_rate(&self) -> f64 {
        if self.evaluated == 0 {
            return 0.0;
        }
        self.table.len() as f64 / self.evaluated as f64
    }
}

/// Fit every candidate in the configured grid against `train` and rank
/// the survivors by AICc, ascending.
///
/// Returns an error only for broken preconditions: a configuration
/// whose grid is empty (an empty series is already rejected by
/// [`Series::new`]). Per-candidate estimation failures never abort the
/// search; they are collected in the report and logged at debug level.
pub fn search(train: &Series, config: &SearchConfig) -> Result<SearchReport> {
    let grid = candidate_grid(config);
    if grid.is_empty() {
        return Err(SearchError::EmptyGrid {
            cap: config.complexity_cap,
        });
    }

    let total = grid.len();
    info!("evaluating {total} candidate specifications on {} observations", train.len());

    let evaluate = |(index, spec): (usize, SarimaSpec)| {
        if should_report(index, total, config.progress_every) {
            info!("candidate {}/{total}: {spec}", index + 1);
        }
        let mut model = Sarima::new(spec);
        let outcome = model.fit_css(train).map(|()| {
            // fit_css always populates the criterion on success.
            model.aicc().unwrap_or(f64::INFINITY)
        });
        (spec, outcome)
    };

    let outcomes: Vec<(SarimaSpec, std::result::Result<f64, FitFailure>)> = if config.parallel {
        grid.into_par_iter().enumerate().map(evaluate).collect()
    } else {
        grid.into_iter().enumerate().map(evaluate).collect()
    };

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (spec, outcome) in outcomes {
        match outcome {
            Ok(aicc) => rows.push(ScoredSpec { spec, aicc }),
            Err(reason) => {
                debug!("discarding {spec}: {reason}");
                failures.push((spec, reason));
            }
        }
    }

    // Stable sort keeps generation order between equal scores.
    rows.sort_by(|a, b| a.aicc.total_cmp(&b.aicc));

    info!(
        "search complete: {} scored, {} discarded",
        rows.len(),
        failures.len()
    );

    Ok(SearchReport {
        evaluated: rows.len() + failures.len(),
        table: RankedTable::from_rows(rows),
        failures,
    })
}

fn should_report(index: usize, total: usize, every: usize) -> bool {
    index == 0 || index + 1 == total || (every > 0 && (index + 1) % every == 0)
}
