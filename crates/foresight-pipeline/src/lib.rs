//! # foresight-pipeline
//!
//! Batch orchestration for the forecasting pipeline: the filesystem
//! artifact area stages hand off through, the run lock, the three stages
//! themselves, and the runner that sequences them.

pub mod artifacts;
pub mod lock;
pub mod runner;
pub mod stages;

pub use artifacts::ArtifactStore;
pub use lock::RunLock;
pub use runner::{Pipeline, RunReport, StageId};
pub use stages::{FailurePolicy, StageReport};
