//! Feature/target construction and the train/held-out split.

use foresight_core::models::HourlyRecord;
use tracing::warn;

use crate::rng::Lcg;

/// Features per sample: timestamp (ms), ISO day of week, weekend flag.
pub const FEATURE_COUNT: usize = 3;

/// One feature row.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Observed samples ready for fitting.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<FeatureRow>,
    pub targets: Vec<f64>,
}

impl Dataset {
    /// Build from stage-1 records, using their stored calendar fields.
    ///
    /// Records without a mean latency (empty buckets) cannot serve as
    /// targets and are dropped with a warning.
    pub fn from_records(records: &[HourlyRecord]) -> Self {
        let mut rows = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());
        for record in records {
            match record.latency_stats.avg {
                Some(avg) => {
                    rows.push(feature_row(record.ts, record.dow, record.weekend));
                    targets.push(avg);
                }
                None => {
                    warn!(ts = record.ts, "dropping record without a mean latency");
                }
            }
        }
        Self { rows, targets }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The subset at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Feature row for one hourly point.
pub fn feature_row(ts_ms: i64, dow: u8, weekend: bool) -> FeatureRow {
    [
        ts_ms as f64,
        f64::from(dow),
        if weekend { 1.0 } else { 0.0 },
    ]
}

/// Shuffled train/held-out index split over `n` samples.
///
/// The held-out share is one third rounded up, leaving two thirds for
/// training; a fixed seed keeps the split identical run to run.
pub fn train_test_split(n: usize, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = Lcg::new(seed);
    rng.shuffle(&mut indices);

    let held_out = n.div_ceil(3);
    let test = indices[..held_out].to_vec();
    let train = indices[held_out..].to_vec();
    (train, test)
}
