/// Orchestration errors for whole pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unknown stage number {number}, valid stages are 1..=3")]
    UnknownStage { number: u8 },

    #[error("another pipeline run holds the lock at {path}")]
    AlreadyRunning { path: String },

    #[error("run lock io failed at {path}: {message}")]
    Lock { path: String, message: String },
}
