/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .vars.join(", "))]
    MissingVars { vars: Vec<String> },

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        var: String,
        value: String,
        reason: String,
    },

    #[error("forecast horizon must cover at least one hour (days={days}, hours={hours})")]
    EmptyHorizon { days: u32, hours: u32 },
}
