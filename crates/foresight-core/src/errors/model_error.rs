/// Regression-model errors raised by the trainer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("not enough observed samples to train: have {have}, need at least {need}")]
    NotEnoughSamples { have: usize, need: usize },

    #[error("extended timeline is empty: horizon end {end_ms} precedes earliest bucket {start_ms}")]
    EmptyTimeline { start_ms: i64, end_ms: i64 },
}
