use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SEARCH_RETRIES, DEFAULT_SEARCH_TIMEOUT_SECS};

/// Connection parameters for the search/observability store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URLs tried in order; the next host is attempted on transport
    /// failure.
    pub hosts: Vec<String>,
    /// Index queried for hourly statistics.
    pub index: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Transient-failure retries per request. The pipeline default is none;
    /// a failed service is skipped or aborts its stage per stage policy.
    pub retries: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["http://localhost:9200".to_string()],
            index: "traces".to_string(),
            timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            retries: DEFAULT_SEARCH_RETRIES,
        }
    }
}
