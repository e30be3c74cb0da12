use async_trait::async_trait;

use crate::errors::ForesightResult;
use crate::models::Service;

/// Read-only access to the relational service registry.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// All monitored services, one per registry row.
    async fn fetch_services(&self) -> ForesightResult<Vec<Service>>;
}
