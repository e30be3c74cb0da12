/// Search/observability store errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("search store returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected search response shape: {message}")]
    MalformedResponse { message: String },

    #[error("all search hosts failed after {attempts} attempts, last error: {last_error}")]
    HostsExhausted { attempts: u32, last_error: String },
}
