//! End-to-end searches over a synthetic monthly series.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use sarima_search::io::{read_ranked_table, write_ranked_table};
use sarima_search::metrics::{mae, rmse, smape};
use sarima_search::prelude::*;
use sarima_search::validation::ljung_box;

/// Trend + annual cycle + seeded noise, in the shape of a monthly
/// demand series.
fn synthetic_series(n: usize) -> Series {
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<f64> = (0..n)
        .map(|t| {
            let trend = 120.0 + 0.4 * t as f64;
            let season = 15.0 * (2.0 * std::f64::consts::PI * (t % 12) as f64 / 12.0).sin();
            trend + season + rng.gen_range(-2.0..2.0)
        })
        .collect();
    Series::new(Month::new(2008, 1).unwrap(), values).unwrap()
}

fn scenario_config() -> SearchConfig {
    SearchConfig {
        p: 0..=2,
        d: 0..=1,
        q: 0..=2,
        sp: 0..=2,
        sd: 1..=1,
        sq: 0..=2,
        complexity_cap: 4,
        period: 12,
        parallel: false,
        progress_every: 25,
    }
}

#[test]
fn full_search_ranks_candidates_by_aicc() {
    let series = synthetic_series(100);
    let report = search(&series, &scenario_config()).unwrap();

    assert!(!report.table.is_empty());

    // Ascending scores, all finite.
    let scores: Vec<f64> = report.table.iter().map(|r| r.aicc).collect();
    assert!(scores.iter().all(|s| s.is_finite()));
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));

    // Cap honored, no duplicates, every spec is from the configured ranges.
    let mut seen = HashSet::new();
    for row in report.table.iter() {
        assert!(row.spec.complexity() <= 4);
        assert!(row.spec.p <= 2 && row.spec.q <= 2);
        assert_eq!(row.spec.sd, 1);
        assert_eq!(row.spec.period, 12);
        assert!(seen.insert(row.spec));
    }

    assert_eq!(report.evaluated, report.table.len() + report.failures.len());
}

#[test]
fn search_is_idempotent() {
    let series = synthetic_series(100);
    let config = scenario_config();
    let first = search(&series, &config).unwrap();
    let second = search(&series, &config).unwrap();
    assert_eq!(first.table, second.table);
}

#[test]
fn parallel_and_sequential_rankings_agree() {
    let series = synthetic_series(100);
    let sequential = search(&series, &scenario_config()).unwrap();
    let parallel = search(&series, &scenario_config().with_parallel(true)).unwrap();
    assert_eq!(sequential.table, parallel.table);
}

#[test]
fn cap_zero_restricts_the_table_to_pure_differencing() {
    let series = synthetic_series(100);
    let config = scenario_config().with_cap(0);
    let report = search(&series, &config).unwrap();

    assert!(!report.table.is_empty());
    for row in report.table.iter() {
        assert_eq!(row.spec.p, 0);
        assert_eq!(row.spec.q, 0);
        assert_eq!(row.spec.sp, 0);
        assert_eq!(row.spec.sq, 0);
    }
}

#[test]
fn impossible_grid_is_a_fatal_error() {
    let series = synthetic_series(100);
    let config = SearchConfig {
        p: 3..=3,
        q: 3..=3,
        complexity_cap: 2,
        ..scenario_config()
    };
    assert!(matches!(
        search(&series, &config),
        Err(SearchError::EmptyGrid { cap: 2 })
    ));
}

#[test]
fn holdout_evaluation_of_the_best_candidate() {
    let series = synthetic_series(206);
    let (train, test) = series.split_holdout(40).unwrap();
    assert_eq!(train.len(), 166);
    assert_eq!(test.len(), 40);

    let report = search(&train, &scenario_config()).unwrap();
    let best = report.table.best().unwrap();

    let mut model = Sarima::new(best.spec);
    model.fit(&train).unwrap();
    let forecast = model.predict(40).unwrap();
    assert_eq!(forecast.horizon(), 40);

    let mae = mae(test.values(), forecast.point()).unwrap();
    let rmse = rmse(test.values(), forecast.point()).unwrap();
    let smape = smape(test.values(), forecast.point()).unwrap();
    assert!(mae.is_finite() && rmse.is_finite() && smape.is_finite());
    assert!(mae <= rmse);

    // A sane winner tracks a clean seasonal series to within a few units.
    assert!(mae < 20.0);
}

#[test]
fn best_candidate_leaves_clean_residuals() {
    let series = synthetic_series(150);
    let report = search(&series, &scenario_config()).unwrap();
    let best = report.table.best().unwrap();

    let mut model = Sarima::new(best.spec);
    model.fit(&series).unwrap();
    let residuals = model.residuals().unwrap();
    let diagnostic = ljung_box(residuals, 24, best.spec.num_coefficients()).unwrap();
    assert!(diagnostic.statistic.is_finite());
    assert!((0.0..=1.0).contains(&diagnostic.p_value));
}

#[test]
fn ranked_table_round_trips_through_csv() {
    let series = synthetic_series(100);
    let report = search(&series, &scenario_config()).unwrap();

    let file = tempfile::NamedTempFile::new().unwrap();
    write_ranked_table(file.path(), &report.table).unwrap();
    let reloaded = read_ranked_table(file.path()).unwrap();

    assert_eq!(reloaded.len(), report.table.len());
    for (a, b) in report.table.iter().zip(reloaded.iter()) {
        assert_eq!(a.spec, b.spec);
        assert!((a.aicc - b.aicc).abs() < 1e-9);
    }
}

#[test]
fn holt_winters_competes_on_the_same_scale() {
    let series = synthetic_series(120);
    let report = search(&series, &scenario_config()).unwrap();
    let best_sarima = report.table.best().unwrap().aicc;

    let mut hw = HoltWinters::auto(12, SeasonalKind::Additive);
    hw.fit(&series).unwrap();
    let hw_aicc = hw.aicc().unwrap();

    // Both criteria are finite and comparable; no ordering is guaranteed.
    assert!(best_sarima.is_finite());
    assert!(hw_aicc.is_finite());
}
