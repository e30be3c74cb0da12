//! Process configuration, resolved once at startup from `FORESIGHT_*`
//! environment variables and passed by parameter into every stage.

pub mod foresight_config;
pub mod horizon_config;
pub mod registry_config;
pub mod search_config;

pub use foresight_config::Config;
pub use horizon_config::HorizonConfig;
pub use registry_config::RegistryConfig;
pub use search_config::SearchConfig;
