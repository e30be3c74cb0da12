use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ForesightResult;
use crate::models::HourlyBucket;

/// Query and write access to the search/observability store.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Hour-truncated traffic statistics for one service, newest bucket first.
    async fn hourly_stats(&self, service_id: i64) -> ForesightResult<Vec<HourlyBucket>>;

    /// Upsert a document, fully replacing any prior document with this id.
    async fn index_document(
        &self,
        collection: &str,
        doc_id: &str,
        document: &Value,
    ) -> ForesightResult<()>;
}
