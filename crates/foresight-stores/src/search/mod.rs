//! HTTP client for the search/observability store.
//!
//! One logical request may sweep several hosts: every configured host is
//! tried in order, and the whole sweep repeats with exponential backoff
//! when retries are configured. Client errors (4xx) fail the request
//! immediately since no other host will answer differently.

mod query;
mod response;

use std::time::Duration;

use async_trait::async_trait;
use foresight_core::config::SearchConfig;
use foresight_core::errors::{ForesightResult, SearchError};
use foresight_core::models::HourlyBucket;
use foresight_core::traits::SearchStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use response::SearchResponse;

/// First retry delay; doubles each round.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
/// Backoff ceiling.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// reqwest-backed [`SearchStore`] with host failover.
#[derive(Debug)]
pub struct HttpSearchStore {
    config: SearchConfig,
    client: reqwest::Client,
}

impl HttpSearchStore {
    /// Build the shared HTTP client from resolved configuration.
    pub fn new(config: SearchConfig) -> ForesightResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| SearchError::Transport {
                url: config.hosts.join(","),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    /// Send `body` to `path` on each configured host in turn.
    async fn send<Resp: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<Resp, SearchError> {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempts = 0;
        let mut last_error = String::new();

        for round in 0..=self.config.retries {
            if round > 0 {
                debug!(
                    round,
                    max = self.config.retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying search request"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }

            for host in &self.config.hosts {
                let url = format!("{host}{path}");
                attempts += 1;

                match self.client.request(method.clone(), url.as_str()).json(body).send().await {
                    Ok(resp) => {
                        let status = resp.status();
                        if status.is_success() {
                            return resp.json::<Resp>().await.map_err(|e| {
                                SearchError::MalformedResponse {
                                    message: format!("undecodable body from {url}: {e}"),
                                }
                            });
                        }
                        if status.is_client_error() {
                            let body_text = resp.text().await.unwrap_or_default();
                            return Err(SearchError::Status {
                                url,
                                status: status.as_u16(),
                                body: body_text,
                            });
                        }
                        warn!(%url, status = status.as_u16(), "search host returned a server error");
                        last_error = format!("HTTP {status} from {url}");
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "search request failed");
                        last_error = format!("{url}: {e}");
                    }
                }
            }
        }

        Err(SearchError::HostsExhausted {
            attempts,
            last_error,
        })
    }
}

#[async_trait]
impl SearchStore for HttpSearchStore {
    async fn hourly_stats(&self, service_id: i64) -> ForesightResult<Vec<HourlyBucket>> {
        let path = format!("/{}/_search", self.config.index);
        let body = query::hourly_stats_body(service_id);
        let parsed: SearchResponse = self.send(reqwest::Method::POST, &path, &body).await?;
        let buckets = parsed.into_buckets()?;
        debug!(service_id, buckets = buckets.len(), "fetched hourly traffic statistics");
        Ok(buckets)
    }

    async fn index_document(
        &self,
        collection: &str,
        doc_id: &str,
        document: &Value,
    ) -> ForesightResult<()> {
        let path = format!("/{collection}/_doc/{doc_id}");
        let _: Value = self.send(reqwest::Method::PUT, &path, document).await?;
        debug!(collection, doc_id, "upserted document");
        Ok(())
    }
}
