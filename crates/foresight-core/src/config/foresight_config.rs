//! Top-level configuration resolved from environment variables.

use std::path::PathBuf;

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_HORIZON_DAYS, DEFAULT_HORIZON_HOURS, DEFAULT_SEARCH_RETRIES,
    DEFAULT_SEARCH_TIMEOUT_SECS,
};
use crate::errors::ConfigError;

use super::{HorizonConfig, RegistryConfig, SearchConfig};

/// Top-level configuration for a pipeline process.
///
/// Built once via [`Config::from_env`] at startup and passed by reference
/// into every stage; nothing reads the environment afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Artifact area root; one subdirectory per service id.
    pub data_dir: PathBuf,
    pub registry: RegistryConfig,
    pub search: SearchConfig,
    pub horizon: HorizonConfig,
}

impl Config {
    /// Resolve configuration from `FORESIGHT_*` environment variables.
    ///
    /// Missing required variables are collected and reported together so a
    /// misconfigured deployment surfaces every absent name at once. Parse
    /// failures name the variable and the offending value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing: Vec<String> = Vec::new();
        let mut require = |name: &str| -> String {
            match std::env::var(name) {
                Ok(value) if !value.trim().is_empty() => value,
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let db_user = require("FORESIGHT_DB_USER");
        let db_password = require("FORESIGHT_DB_PASSWORD");
        let db_host = require("FORESIGHT_DB_HOST");
        let db_port = require("FORESIGHT_DB_PORT");
        let search_hosts = require("FORESIGHT_SEARCH_HOSTS");
        let search_index = require("FORESIGHT_SEARCH_INDEX");

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars { vars: missing });
        }

        let registry = RegistryConfig {
            user: db_user.trim().to_string(),
            password: db_password,
            host: db_host.trim().to_string(),
            port: parse_var("FORESIGHT_DB_PORT", &db_port)?,
            database: optional_var("FORESIGHT_DB_NAME"),
        };

        let search = SearchConfig {
            hosts: parse_hosts("FORESIGHT_SEARCH_HOSTS", &search_hosts)?,
            index: search_index.trim().to_string(),
            timeout_secs: parse_var_or("FORESIGHT_SEARCH_TIMEOUT_SECS", DEFAULT_SEARCH_TIMEOUT_SECS)?,
            retries: parse_var_or("FORESIGHT_SEARCH_RETRIES", DEFAULT_SEARCH_RETRIES)?,
        };

        let horizon = HorizonConfig::new(
            parse_var_or("FORESIGHT_HORIZON_DAYS", DEFAULT_HORIZON_DAYS)?,
            parse_var_or("FORESIGHT_HORIZON_HOURS", DEFAULT_HORIZON_HOURS)?,
        )?;

        let data_dir = optional_var("FORESIGHT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            data_dir,
            registry,
            search,
            horizon,
        })
    }
}

/// Parse a required value, naming the variable on failure.
fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| ConfigError::InvalidVar {
        var: var.to_string(),
        value: value.to_string(),
        reason: err.to_string(),
    })
}

/// Parse an optional variable, falling back to a compiled default.
fn parse_var_or<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => parse_var(var, &value),
        _ => Ok(default),
    }
}

/// A set variable's trimmed value, treating empty as unset.
fn optional_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Split a comma-separated host list, normalizing trailing slashes.
fn parse_hosts(var: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let hosts: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(|host| host.trim_end_matches('/').to_string())
        .collect();

    if hosts.is_empty() {
        return Err(ConfigError::InvalidVar {
            var: var.to_string(),
            value: value.to_string(),
            reason: "expected at least one host url".to_string(),
        });
    }
    Ok(hosts)
}
