/// Foresight system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Artifact format version embedded in stage-1 and stage-2 JSON.
pub const SCHEMA_VERSION: u32 = 1;

/// Collection receiving published forecast documents.
pub const PREDICT_COLLECTION: &str = "predict";

/// Cap on hourly buckets returned per service by the terms aggregation.
pub const MAX_HOURLY_BUCKETS: u32 = 10_000;

/// Trees in the random-forest regressor.
pub const FOREST_TREES: usize = 200;

/// Seed for the train/held-out split shuffle.
pub const SPLIT_SEED: u64 = 0;

/// Default artifact area root.
pub const DEFAULT_DATA_DIR: &str = "output";

/// Default forecast horizon components.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;
pub const DEFAULT_HORIZON_HOURS: u32 = 0;

/// Default per-request search store timeout.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;

/// Default transient-failure retries per search request.
pub const DEFAULT_SEARCH_RETRIES: u32 = 0;
