//! # foresight-core
//!
//! Foundation crate for the Foresight latency-forecasting pipeline.
//! Defines configuration, errors, domain models, store traits, calendar
//! helpers, and tracing setup. Every other crate in the workspace depends
//! on this.

pub mod calendar;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::Config;
pub use errors::{ForesightError, ForesightResult};
pub use models::{ExtractArtifact, ForecastDocument, HourlyBucket, HourlyRecord, Service};
pub use traits::{SearchStore, ServiceRegistry};
