//! Extended hourly timeline construction.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use foresight_core::calendar::{self, MS_PER_HOUR};
use foresight_core::errors::ModelError;
use foresight_core::models::HourlyRecord;

use crate::dataset::{feature_row, FeatureRow};

/// One point on the extended timeline.
#[derive(Debug, Clone)]
pub struct TimelinePoint {
    /// Point timestamp, epoch milliseconds.
    pub ts: i64,
    /// Second-resolution ISO rendering of `ts`.
    pub ts_iso: String,
    /// ISO day of week, Monday = 1 .. Sunday = 7.
    pub dow: u8,
    /// True for Saturday and Sunday.
    pub weekend: bool,
    /// Features for the regressors.
    pub features: FeatureRow,
    /// Observed mean latency when `ts` matches an observed bucket.
    pub observed: Option<f64>,
}

/// Hourly points from the earliest observed bucket through `now + horizon`.
///
/// Records arrive newest-first (stage-1 order), so the last record anchors
/// the range start. Observed targets are matched by exact epoch-ms
/// equality; hour-truncated bucket keys line up with the hourly step by
/// construction. The range ends on the last hourly step at or before
/// `now + horizon`. No records yields no points.
pub fn extend(
    records: &[HourlyRecord],
    now: DateTime<Utc>,
    horizon: Duration,
) -> Result<Vec<TimelinePoint>, ModelError> {
    let start_ms = match records.last() {
        Some(record) => record.ts,
        None => return Ok(Vec::new()),
    };
    let end_ms = (now + horizon).timestamp_millis();
    if end_ms < start_ms {
        return Err(ModelError::EmptyTimeline { start_ms, end_ms });
    }

    let observed: HashMap<i64, f64> = records
        .iter()
        .filter_map(|record| record.latency_stats.avg.map(|avg| (record.ts, avg)))
        .collect();

    let mut points = Vec::with_capacity(((end_ms - start_ms) / MS_PER_HOUR + 1) as usize);
    let mut ts = start_ms;
    while ts <= end_ms {
        let dow = calendar::iso_weekday_of_ms(ts);
        let weekend = calendar::is_weekend(dow);
        let ts_iso = calendar::utc_from_ms(ts)
            .map(calendar::iso_compact)
            .unwrap_or_default();
        points.push(TimelinePoint {
            ts,
            ts_iso,
            dow,
            weekend,
            features: feature_row(ts, dow, weekend),
            observed: observed.get(&ts).copied(),
        });
        ts += MS_PER_HOUR;
    }
    Ok(points)
}
