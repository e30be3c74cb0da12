use serde::{Deserialize, Serialize};

use crate::calendar::{MS_PER_DAY, MS_PER_HOUR};

/// One extended-timeline point in stage-2 artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Second-resolution ISO rendering of `ts`.
    pub ts_iso: String,
    /// Point timestamp, epoch milliseconds.
    pub ts: i64,
    /// ISO day of week, Monday = 1 .. Sunday = 7.
    pub dow: u8,
    /// True for Saturday and Sunday.
    pub weekend: bool,
    /// Observed mean latency; present only for observed hours.
    pub latency: Option<f64>,
    /// Random-forest prediction for this hour.
    pub latency_random_forest: f64,
    /// Linear-regression prediction for this hour.
    pub latency_linear: f64,
}

/// Error metrics for both regressors, evaluated over observed points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mae_linear: f64,
    pub mse_linear: f64,
    pub r2_linear: f64,
    pub mae_random_forest: f64,
    pub mse_random_forest: f64,
    pub r2_random_forest: f64,
}

/// Bounds of the forecast window, all epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRange {
    /// Earliest observed bucket.
    pub start: i64,
    /// Newest observed bucket.
    pub current: i64,
    /// Last extended-timeline point.
    pub end: i64,
    /// Milliseconds per day, for consumers stepping the range.
    pub per_day: i64,
    /// Milliseconds per hour.
    pub per_hour: i64,
}

impl PredictRange {
    /// Build a range from observed bounds and the timeline end.
    pub fn new(start: i64, current: i64, end: i64) -> Self {
        Self {
            start,
            current,
            end,
            per_day: MS_PER_DAY,
            per_hour: MS_PER_HOUR,
        }
    }
}

/// Stage-2 scored artifact; also the exact document published to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    /// Artifact format version, checked by stage-3 readers.
    pub schema: u32,
    /// Service id carried over from the stage-1 artifact.
    pub service_id: i64,
    pub metrics: ForecastMetrics,
    pub predict_range: PredictRange,
    /// Timestamp unit tag, always `"ms"`.
    pub ts_unit: String,
    /// One row per extended-timeline point, earliest first.
    pub data: Vec<ForecastRow>,
}
