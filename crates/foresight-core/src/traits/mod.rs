//! Store traits the pipeline stages are generic over.
//! Concrete clients live in `foresight-stores`; tests use in-memory mocks.

pub mod registry;
pub mod search;

pub use registry::ServiceRegistry;
pub use search::SearchStore;
