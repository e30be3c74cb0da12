//! The three pipeline stages: extract, train, publish.

pub mod extract;
pub mod publish;
pub mod train;

use std::fmt;

/// What a stage does when one service fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and continue with the remaining services.
    SkipService,
    /// Stop the stage and surface the error to the runner.
    AbortStage,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkipService => write!(f, "skip-service"),
            Self::AbortStage => write!(f, "abort-stage"),
        }
    }
}

/// Per-stage outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Services whose artifacts were written or published.
    pub processed: usize,
    /// Services skipped after a logged failure.
    pub skipped: usize,
}
