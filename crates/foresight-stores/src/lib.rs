//! # foresight-stores
//!
//! Concrete store clients behind the `foresight-core` traits: a Postgres
//! service registry over SeaORM and an HTTP search-store client over
//! reqwest with per-host failover, retry, and backoff.
//!
//! Both clients are configured from [`foresight_core::config`] structs and
//! constructed once at startup; the pipeline only sees the trait objects.

pub mod registry;
pub mod search;

pub use registry::PostgresRegistry;
pub use search::HttpSearchStore;
