//! Search response decoding.

use serde::Deserialize;

use foresight_core::errors::SearchError;
use foresight_core::models::HourlyBucket;

/// A `_search` response body, reduced to the parts the pipeline reads.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    aggregations: Option<Aggregations>,
}

/// The container key matches the aggregation name `hourly_stats_body`
/// requests.
#[derive(Debug, Deserialize)]
struct Aggregations {
    hourly: TermsBuckets,
}

#[derive(Debug, Deserialize)]
struct TermsBuckets {
    buckets: Vec<HourlyBucket>,
}

impl SearchResponse {
    /// Hourly buckets in store order, newest first.
    pub(crate) fn into_buckets(self) -> Result<Vec<HourlyBucket>, SearchError> {
        match self.aggregations {
            Some(aggregations) => Ok(aggregations.hourly.buckets),
            None => Err(SearchError::MalformedResponse {
                message: "search response has no aggregations".to_string(),
            }),
        }
    }
}
