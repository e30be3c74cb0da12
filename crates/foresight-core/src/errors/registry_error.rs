/// Relational service-registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry connection failed: {message}")]
    Connection { message: String },

    #[error("registry query failed: {message}")]
    Query { message: String },

    #[error("malformed service row: {message}")]
    MalformedRow { message: String },
}
