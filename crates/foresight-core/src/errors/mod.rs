//! Error handling for Foresight.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod artifact_error;
pub mod config_error;
pub mod model_error;
pub mod pipeline_error;
pub mod registry_error;
pub mod search_error;

pub use artifact_error::ArtifactError;
pub use config_error::ConfigError;
pub use model_error::ModelError;
pub use pipeline_error::PipelineError;
pub use registry_error::RegistryError;
pub use search_error::SearchError;

/// Top-level error aggregating subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ForesightError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Convenience alias used across the workspace.
pub type ForesightResult<T> = Result<T, ForesightError>;
