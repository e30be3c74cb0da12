use serde::{Deserialize, Serialize};

use crate::calendar;

/// One `stats` aggregation result from the search store.
///
/// Buckets with no matching documents report `count == 0` and null
/// min/max/avg/sum, so the numeric fields stay optional end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub sum: Option<f64>,
}

/// Raw hourly terms bucket as returned by the search store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Hour-truncated bucket start, epoch milliseconds.
    pub key: i64,
    /// The store's ISO rendering of `key`.
    pub key_as_string: String,
    /// Documents aggregated into this bucket.
    pub doc_count: u64,
    pub latency_stats: StatSummary,
    pub request_size_stats: StatSummary,
    pub response_size_stats: StatSummary,
}

/// Flat per-hour record persisted in stage-1 artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Bucket start, epoch milliseconds.
    pub ts: i64,
    /// The store's ISO rendering of `ts`, carried verbatim.
    pub ts_iso: String,
    /// ISO day of week, Monday = 1 .. Sunday = 7.
    pub dow: u8,
    /// True for Saturday and Sunday.
    pub weekend: bool,
    /// Documents observed in this hour.
    pub occurrences: u64,
    pub latency_stats: StatSummary,
    pub request_size_stats: StatSummary,
    pub response_size_stats: StatSummary,
}

impl HourlyRecord {
    /// Enrich a raw bucket with calendar fields derived from its key.
    pub fn from_bucket(bucket: HourlyBucket) -> Self {
        let dow = calendar::iso_weekday_of_ms(bucket.key);
        Self {
            ts: bucket.key,
            ts_iso: bucket.key_as_string,
            dow,
            weekend: calendar::is_weekend(dow),
            occurrences: bucket.doc_count,
            latency_stats: bucket.latency_stats,
            request_size_stats: bucket.request_size_stats,
            response_size_stats: bucket.response_size_stats,
        }
    }
}

/// Stage-1 artifact: one service's enriched hourly records.
///
/// `data` keeps store order, descending bucket start, so the last record
/// is the earliest observed hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractArtifact {
    /// Artifact format version, checked by stage-2 readers.
    pub schema: u32,
    /// Service id from the registry.
    pub id: i64,
    /// Service display name.
    pub name: String,
    pub data: Vec<HourlyRecord>,
}
