//! # foresight-model
//!
//! Regression internals for the forecasting pipeline: a deterministic
//! generator, dataset construction and splitting, a least-squares linear
//! regressor, a bagged regression forest, error metrics, and extended
//! hourly timeline construction.
//!
//! Everything here is pure computation over in-memory data; store access
//! and artifact IO live elsewhere.

pub mod dataset;
pub mod forest;
pub mod linear;
pub mod metrics;
pub mod rng;
pub mod timeline;
pub mod tree;

pub use dataset::{feature_row, train_test_split, Dataset, FeatureRow, FEATURE_COUNT};
pub use forest::RandomForest;
pub use linear::LinearRegressor;
pub use rng::Lcg;
pub use timeline::{extend, TimelinePoint};
