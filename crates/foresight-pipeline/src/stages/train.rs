//! Stage 2: fit both regressors per extracted service and write the
//! tabular and scored stage-2 artifacts.

use std::path::Path;

use chrono::{DateTime, Utc};
use foresight_core::config::HorizonConfig;
use foresight_core::constants::{FOREST_TREES, SCHEMA_VERSION, SPLIT_SEED};
use foresight_core::errors::{ForesightResult, ModelError};
use foresight_core::models::{ForecastDocument, ForecastMetrics, ForecastRow, PredictRange};
use foresight_model::metrics::{mean_absolute_error, mean_squared_error, r2_score};
use foresight_model::{timeline, Dataset, LinearRegressor, RandomForest};
use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::stages::{FailurePolicy, StageReport};

/// Training aborts the stage on the first failing service.
pub const POLICY: FailurePolicy = FailurePolicy::AbortStage;

/// Fitting needs at least one sample on each side of the split.
const MIN_SAMPLES: usize = 2;

/// Run the trainer over every service directory in the artifact area.
///
/// The service set comes from the filesystem, not the registry, so a
/// directory without a fresh registry row is still trained.
pub fn run(
    artifacts: &ArtifactStore,
    horizon: HorizonConfig,
    now: DateTime<Utc>,
) -> ForesightResult<StageReport> {
    let dirs = artifacts.service_dirs()?;
    info!(services = dirs.len(), "training forecasts");

    let mut report = StageReport::default();
    for dir in &dirs {
        let document = train_service(artifacts, dir, horizon, now)?;
        report.processed += 1;
        info!(
            service_id = document.service_id,
            points = document.data.len(),
            "wrote stage-2 artifacts"
        );
    }

    info!(processed = report.processed, "training finished");
    Ok(report)
}

/// Train both regressors for one service directory.
///
/// Metrics cover every observed point on the extended timeline, training
/// and held-out alike; the split only keeps held-out points out of the
/// fit.
fn train_service(
    artifacts: &ArtifactStore,
    dir: &Path,
    horizon: HorizonConfig,
    now: DateTime<Utc>,
) -> ForesightResult<ForecastDocument> {
    let artifact = artifacts.read_stage1(dir)?;

    // Stage-1 order is newest first, so the bounds sit at the ends.
    let (earliest_ts, newest_ts) = match (artifact.data.last(), artifact.data.first()) {
        (Some(earliest), Some(newest)) => (earliest.ts, newest.ts),
        _ => {
            return Err(ModelError::NotEnoughSamples {
                have: 0,
                need: MIN_SAMPLES,
            }
            .into())
        }
    };

    let dataset = Dataset::from_records(&artifact.data);
    if dataset.len() < MIN_SAMPLES {
        return Err(ModelError::NotEnoughSamples {
            have: dataset.len(),
            need: MIN_SAMPLES,
        }
        .into());
    }

    let (train_idx, held_out_idx) = foresight_model::train_test_split(dataset.len(), SPLIT_SEED);
    let train = dataset.select(&train_idx);
    debug!(
        service_id = artifact.id,
        samples = dataset.len(),
        train = train_idx.len(),
        held_out = held_out_idx.len(),
        "split observed samples"
    );

    // TODO: cap the extended timeline length so very old services do not
    // produce oversized documents.
    let points = timeline::extend(&artifact.data, now, horizon.as_duration())?;

    let forest = RandomForest::fit(&train.rows, &train.targets, FOREST_TREES, SPLIT_SEED);
    let linear = LinearRegressor::fit(&train.rows, &train.targets);

    let mut rows = Vec::with_capacity(points.len());
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
        rows.push(ForecastRow {
            ts_iso: point.ts_iso.clone(),
            ts: point.ts,
            dow: point.dow,
            weekend: point.weekend,
            latency: point.observed,
            latency_random_forest: forest_value,
            latency_linear: linear_value,
        });
    }

    let end_ts = points.last().map_or(earliest_ts, |point| point.ts);
    let document = ForecastDocument {
        schema: SCHEMA_VERSION,
        service_id: artifact.id,
        metrics: ForecastMetrics {
            mae_linear: mean_absolute_error(&observed, &linear_predicted),
            mse_linear: mean_squared_error(&observed, &linear_predicted),
            r2_linear: r2_score(&observed, &linear_predicted),
            mae_random_forest: mean_absolute_error(&observed, &forest_predicted),
            mse_random_forest: mean_squared_error(&observed, &forest_predicted),
            r2_random_forest: r2_score(&observed, &forest_predicted),
        },
        predict_range: PredictRange::new(earliest_ts, newest_ts, end_ts),
        ts_unit: "ms".to_string(),
        data: rows,
    };

    artifacts.write_stage2(dir, &document)?;
    Ok(document)
}
