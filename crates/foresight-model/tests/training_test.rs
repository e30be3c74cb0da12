//! End-to-end training flow over the model layer: records to dataset to
//! split to fitted regressors to timeline predictions and metrics.

use chrono::Duration;
use proptest::prelude::*;

use foresight_core::calendar::{self, MS_PER_HOUR};
use foresight_core::constants::{FOREST_TREES, SPLIT_SEED};
use foresight_core::models::{HourlyRecord, StatSummary};
use foresight_model::{
    dataset::{train_test_split, Dataset},
    forest::RandomForest,
    linear::LinearRegressor,
    metrics, timeline,
};

// 2023-11-13T00:00:00Z, a Monday midnight bucket key.
const BASE: i64 = 1_699_833_600_000;

fn stats(avg: Option<f64>) -> StatSummary {
    StatSummary {
        count: avg.map_or(0, |_| 20),
        min: avg.map(|a| a * 0.5),
        max: avg.map(|a| a * 1.5),
        avg,
        sum: avg.map(|a| a * 20.0),
    }
}

fn record(ts: i64, avg: f64) -> HourlyRecord {
    let dow = calendar::iso_weekday_of_ms(ts);
    HourlyRecord {
        ts,
        ts_iso: String::new(),
        dow,
        weekend: calendar::is_weekend(dow),
        occurrences: 20,
        latency_stats: stats(Some(avg)),
        request_size_stats: stats(Some(256.0)),
        response_size_stats: stats(Some(1024.0)),
    }
}

/// A week of hourly records, newest first, with a daily latency wave.
fn weekly_records() -> Vec<HourlyRecord> {
    (0..168)
        .map(|h| {
            let wave = 25.0 * ((h % 24) as f64 / 24.0 - 0.5).abs();
            record(BASE + h * MS_PER_HOUR, 100.0 + wave)
        })
        .rev()
        .collect()
}

#[test]
fn full_training_flow_scores_every_observed_point() {
    let records = weekly_records();
    let dataset = Dataset::from_records(&records);
    assert_eq!(dataset.len(), 168);

    let (train_idx, test_idx) = train_test_split(dataset.len(), SPLIT_SEED);
    assert_eq!(test_idx.len(), 56);
    assert_eq!(train_idx.len(), 112);
    let train = dataset.select(&train_idx);

    let now = calendar::utc_from_ms(BASE + 167 * MS_PER_HOUR).unwrap();
    let points = timeline::extend(&records, now, Duration::days(1)).unwrap();
    assert_eq!(points.len(), 168 + 24);

    let forest = RandomForest::fit(&train.rows, &train.targets, FOREST_TREES, SPLIT_SEED);
    let linear = LinearRegressor::fit(&train.rows, &train.targets);

    let mut observed = Vec::new();
    let mut forest_predicted = Vec::new();
    let mut linear_predicted = Vec::new();
    for point in &points {
        let forest_value = forest.predict(&point.features);
        let linear_value = linear.predict(&point.features);
        if let Some(target) = point.observed {
            observed.push(target);
            forest_predicted.push(forest_value);
            linear_predicted.push(linear_value);
        }
    }

    // Every observed hour participates in the evaluation.
    assert_eq!(observed.len(), 168);

    let forest_mae = metrics::mean_absolute_error(&observed, &forest_predicted);
    let linear_mae = metrics::mean_absolute_error(&observed, &linear_predicted);

    // Targets live in [100, 112.5]; a sane fit stays well inside that band.
    assert!(forest_mae < 12.5, "forest mae = {forest_mae}");
    assert!(linear_mae < 12.5, "linear mae = {linear_mae}");

    // The forest memorizes the daily wave far better than a straight line.
    assert!(forest_mae <= linear_mae);

    let forest_r2 = metrics::r2_score(&observed, &forest_predicted);
    assert!(forest_r2 > 0.5, "forest r2 = {forest_r2}");
}

#[test]
fn training_is_reproducible_across_runs() {
    let records = weekly_records();
    let dataset = Dataset::from_records(&records);

    let (train_idx_a, _) = train_test_split(dataset.len(), SPLIT_SEED);
    let (train_idx_b, _) = train_test_split(dataset.len(), SPLIT_SEED);
    assert_eq!(train_idx_a, train_idx_b);

    let train = dataset.select(&train_idx_a);
    let forest_a = RandomForest::fit(&train.rows, &train.targets, 40, SPLIT_SEED);
    let forest_b = RandomForest::fit(&train.rows, &train.targets, 40, SPLIT_SEED);

    let probe = foresight_model::feature_row(BASE + 500 * MS_PER_HOUR, 3, false);
    assert_eq!(forest_a.predict(&probe), forest_b.predict(&probe));
}

proptest! {
    #[test]
    fn split_is_a_partition_for_any_size_and_seed(n in 1usize..200, seed in 0u64..1000) {
        let (train, test) = train_test_split(n, seed);
        prop_assert_eq!(test.len(), n.div_ceil(3));
        prop_assert_eq!(train.len() + test.len(), n);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn forest_predictions_stay_in_target_hull(
        targets in proptest::collection::vec(1.0f64..1000.0, 4..40),
        seed in 0u64..50,
    ) {
        let rows: Vec<[f64; 3]> = (0..targets.len())
            .map(|h| foresight_model::feature_row(BASE + h as i64 * MS_PER_HOUR, 1, false))
            .collect();
        let forest = RandomForest::fit(&rows, &targets, 10, seed);

        let lo = targets.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = targets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for h in 0..targets.len() as i64 + 8 {
            let p = forest.predict(&foresight_model::feature_row(BASE + h * MS_PER_HOUR, 1, false));
            prop_assert!(p >= lo - 1e-9 && p <= hi + 1e-9);
        }
    }
}
