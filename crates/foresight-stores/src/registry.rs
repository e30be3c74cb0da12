//! Postgres-backed service registry.

use std::time::Duration;

use async_trait::async_trait;
use foresight_core::config::RegistryConfig;
use foresight_core::errors::{ForesightResult, RegistryError};
use foresight_core::models::Service;
use foresight_core::traits::ServiceRegistry;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, FromQueryResult, Statement,
};
use tracing::{debug, info};

/// The one query the pipeline runs against the registry.
const SELECT_SERVICES: &str = "SELECT id, name, host FROM services";

/// Row shape of the `services` table. The id column is a plain serial,
/// widened to `i64` at the model boundary.
#[derive(Debug, FromQueryResult)]
struct ServiceRow {
    id: i32,
    name: String,
    host: Option<String>,
}

/// SeaORM-backed [`ServiceRegistry`] client.
#[derive(Debug, Clone)]
pub struct PostgresRegistry {
    connection: DatabaseConnection,
}

impl PostgresRegistry {
    /// Connect to the registry database.
    ///
    /// The pool floor is zero so an idle scheduler holds no registry
    /// connection between runs.
    pub async fn connect(config: &RegistryConfig) -> ForesightResult<Self> {
        let mut options = ConnectOptions::new(config.url());
        options
            .max_connections(5)
            .min_connections(0)
            .connect_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let connection = Database::connect(options)
            .await
            .map_err(|e| RegistryError::Connection {
                message: format!("failed to connect to {}:{}: {e}", config.host, config.port),
            })?;

        info!(host = %config.host, port = config.port, "connected to service registry");
        Ok(Self { connection })
    }
}

#[async_trait]
impl ServiceRegistry for PostgresRegistry {
    async fn fetch_services(&self) -> ForesightResult<Vec<Service>> {
        let rows = ServiceRow::find_by_statement(Statement::from_string(
            self.connection.get_database_backend(),
            SELECT_SERVICES,
        ))
        .all(&self.connection)
        .await
        .map_err(|e| RegistryError::Query {
            message: e.to_string(),
        })?;

        debug!(services = rows.len(), "fetched service registry rows");

        Ok(rows
            .into_iter()
            .map(|row| Service {
                id: i64::from(row.id),
                name: row.name,
                host: row.host,
            })
            .collect())
    }
}
