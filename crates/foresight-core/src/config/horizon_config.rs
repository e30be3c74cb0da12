use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HORIZON_DAYS, DEFAULT_HORIZON_HOURS};
use crate::errors::ConfigError;

/// Forecast horizon with day and hour components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonConfig {
    pub days: u32,
    pub hours: u32,
}

impl HorizonConfig {
    /// Build a horizon, rejecting one that covers no time at all.
    pub fn new(days: u32, hours: u32) -> Result<Self, ConfigError> {
        if days == 0 && hours == 0 {
            return Err(ConfigError::EmptyHorizon { days, hours });
        }
        Ok(Self { days, hours })
    }

    /// The horizon as a duration.
    pub fn as_duration(&self) -> Duration {
        Duration::days(i64::from(self.days)) + Duration::hours(i64::from(self.hours))
    }
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_HORIZON_DAYS,
            hours: DEFAULT_HORIZON_HOURS,
        }
    }
}
