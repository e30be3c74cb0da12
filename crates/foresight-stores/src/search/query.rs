//! Search request bodies.

use foresight_core::constants::MAX_HOURLY_BUCKETS;
use serde_json::{json, Value};

/// Painless script behind the `hour_truncated_time` runtime field:
/// `@timestamp` truncated to the hour, emitted as epoch milliseconds.
const HOUR_TRUNCATION_SCRIPT: &str = "ZonedDateTime truncated = doc['@timestamp'].value.truncatedTo(ChronoUnit.HOURS); emit(truncated.toEpochSecond() * 1000L);";

/// Aggregation request for one service's hour-bucketed traffic statistics.
///
/// `size: 0` suppresses hits; everything of interest arrives through the
/// `hourly` terms aggregation, newest bucket first.
pub(crate) fn hourly_stats_body(service_id: i64) -> Value {
    json!({
        "size": 0,
        "query": {
            "bool": {
                "must": {
                    "match": { "service.id": service_id }
                }
            }
        },
        "runtime_mappings": {
            "hour_truncated_time": {
                "type": "date",
                "script": HOUR_TRUNCATION_SCRIPT
            }
        },
        "aggs": {
            "hourly": {
                "terms": {
                    "field": "hour_truncated_time",
                    "size": MAX_HOURLY_BUCKETS,
                    "order": { "_key": "desc" }
                },
                "aggs": {
                    "latency_stats": { "stats": { "field": "latencies.request" } },
                    "request_size_stats": { "stats": { "field": "request.size" } },
                    "response_size_stats": { "stats": { "field": "response.size" } }
                }
            }
        }
    })
}
