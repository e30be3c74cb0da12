//! Domain models shared across the pipeline stages.

pub mod bucket;
pub mod forecast;
pub mod service;

pub use bucket::{ExtractArtifact, HourlyBucket, HourlyRecord, StatSummary};
pub use forecast::{ForecastDocument, ForecastMetrics, ForecastRow, PredictRange};
pub use service::Service;
