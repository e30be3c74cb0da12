/// Filesystem artifact errors for the inter-stage hand-off area.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact io failed at {path}: {message}")]
    Io { path: String, message: String },

    #[error("artifact serialization failed at {path}: {message}")]
    Serialization { path: String, message: String },

    #[error("artifact schema mismatch at {path}: found version {found}, supported version {supported}")]
    SchemaMismatch {
        path: String,
        found: u32,
        supported: u32,
    },
}
